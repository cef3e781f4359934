diesel::table! {
    brands (id) {
        id -> Int8,
        slug -> Varchar,
        name -> Varchar,
        domain -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    case_types (id) {
        id -> Int8,
        brand_id -> Int8,
        slug -> Varchar,
        name -> Varchar,
        category -> Varchar,
        pillar_slug -> Nullable<Varchar>,
        state_slug -> Nullable<Varchar>,
        city_slug -> Nullable<Varchar>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    leads (id) {
        id -> Int8,
        brand_id -> Int8,
        source -> Varchar,
        case_type_id -> Nullable<Int8>,
        injury_id -> Nullable<Int8>,
        geo_id -> Nullable<Int8>,
        phone -> Varchar,
        email -> Varchar,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        zip_code -> Nullable<Varchar>,
        qualifiers -> Jsonb,
        payload -> Jsonb,
        consent_snapshot -> Jsonb,
        user_agent -> Nullable<Text>,
        fingerprint_data -> Jsonb,
        page_context -> Jsonb,
        session_id -> Nullable<Varchar>,
        status -> Varchar,
        form_provider -> Varchar,
        form_version -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    lead_audit_log (id) {
        id -> Int8,
        brand_id -> Int8,
        lead_id -> Int8,
        event_type -> Varchar,
        actor -> Nullable<Varchar>,
        metadata -> Jsonb,
        ip_address -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(case_types -> brands (brand_id));
diesel::joinable!(leads -> brands (brand_id));
diesel::joinable!(leads -> case_types (case_type_id));
diesel::joinable!(lead_audit_log -> leads (lead_id));

diesel::allow_tables_to_appear_in_same_query!(brands, case_types, leads, lead_audit_log,);
