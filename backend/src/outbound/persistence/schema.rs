//! Diesel table definitions; must match `migrations/` exactly.

diesel::table! {
    /// User records.
    users (id) {
        /// Store-generated identifier.
        id -> Uuid,
        firstname -> Varchar,
        lastname -> Varchar,
        /// Lowercased email address.
        email -> Varchar,
        /// Insertion time; orders listings.
        created_at -> Timestamptz,
    }
}
