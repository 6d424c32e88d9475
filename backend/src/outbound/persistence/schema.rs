//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `migrations/` exactly;
//! regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 255]
        display_name -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        is_active -> Bool,
        is_staff -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    access_tokens (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 64]
        token_digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 255]
        title -> Varchar,
        description -> Text,
        time_minutes -> Int4,
        price -> Numeric,
        #[max_length = 255]
        link -> Nullable<Varchar>,
        #[max_length = 255]
        image_key -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    attributes (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 10]
        kind -> Varchar,
        #[max_length = 255]
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipe_attributes (recipe_id, attribute_id) {
        recipe_id -> Uuid,
        attribute_id -> Uuid,
    }
}

diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(attributes -> users (user_id));
diesel::joinable!(recipe_attributes -> recipes (recipe_id));
diesel::joinable!(recipe_attributes -> attributes (attribute_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    access_tokens,
    recipes,
    attributes,
    recipe_attributes,
);
