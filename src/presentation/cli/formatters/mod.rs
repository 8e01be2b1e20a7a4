pub mod summary_fmt;
