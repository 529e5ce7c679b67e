pub mod question_set;
