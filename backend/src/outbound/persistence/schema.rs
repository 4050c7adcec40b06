//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Encoded salted digest, never the raw password.
        password_hash -> Text,
        /// Privileged accounts survive demo-data wipes.
        is_privileged -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named flashcard collections, one owner each.
    decks (id) {
        id -> Int8,
        name -> Varchar,
        description -> Nullable<Text>,
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Question/answer cards. `owner_id` always matches the deck's owner.
    flashcards (id) {
        id -> Int8,
        question -> Text,
        answer -> Text,
        deck_id -> Int8,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(decks -> users (owner_id));
diesel::joinable!(flashcards -> decks (deck_id));

diesel::allow_tables_to_appear_in_same_query!(users, decks, flashcards);
