#[derive(Debug)]
pub struct ApiUrls;

impl ApiUrls {
    // Lead intake
    pub const INTAKE_LEAD: &'static str = "/api/intake/lead";

    // Service health
    pub const HEALTH: &'static str = "/health";
}
