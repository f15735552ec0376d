//! Diesel schema for evaluation persistence.

diesel::table! {
    /// Document scoring records created upstream and updated by the worker.
    ai_doc_score_record (id) {
        /// Externally assigned task identifier.
        #[max_length = 64]
        id -> Varchar,
        /// Task status.
        #[max_length = 32]
        status -> Varchar,
        /// Serialised evaluation payload.
        doc_evaluation -> Nullable<Text>,
        /// Overall score in `0..=100`.
        overall_score -> Integer,
        /// Timestamp of the last status write.
        score_time -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Administrator-managed key/value settings.
    config (key) {
        /// Setting key.
        #[max_length = 255]
        key -> Varchar,
        /// Setting value.
        value -> Nullable<Text>,
    }
}
