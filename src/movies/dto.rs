use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    /// Absent and `null` both mean 0.
    pub metascore: Option<i32>,
    pub userscore: Option<i32>,
}
