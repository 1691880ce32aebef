pub type Age = i64; //student age column, INTEGER in the schema
pub type RowCount = usize; //for generation sizes and result counts
