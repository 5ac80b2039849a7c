diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    chunks (id) {
        id -> Int8,
        content -> Nullable<Text>,
        embedding -> Nullable<Vector>,
    }
}
