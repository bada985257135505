//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    /// Account records. `updated_at` is maintained by a trigger.
    users (id) {
        id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        avatar -> Nullable<Text>,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 254]
        email_update -> Nullable<Varchar>,
        #[max_length = 255]
        password -> Varchar,
        #[max_length = 40]
        activation_code -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
