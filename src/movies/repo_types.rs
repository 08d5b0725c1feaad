use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type MovieId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: Option<i32>,
    pub metascore: i32,
    pub userscore: i32,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub metascore: i32,
    pub userscore: i32,
}
