pub mod column_type;
pub mod options;
pub mod profile;
pub mod statement;
pub mod value_kind;
