pub mod arrow_sql_gen;
