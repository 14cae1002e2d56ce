/// Server-assigned database identifier.
pub type DbId = i64;
