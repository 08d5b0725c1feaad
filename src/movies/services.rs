use crate::{
    error::AppError,
    movies::repo_types::{Movie, MovieId, NewMovie},
    store::Store,
};

pub async fn create(
    store: &dyn Store,
    title: &str,
    year: Option<i32>,
    metascore: i32,
    userscore: i32,
) -> Result<MovieId, AppError> {
    if title.is_empty() {
        return Err(AppError::missing("Missing title"));
    }
    let movie = store
        .insert_movie(NewMovie {
            title: title.to_string(),
            year,
            metascore,
            userscore,
        })
        .await?;
    Ok(movie.id)
}

pub async fn list(store: &dyn Store) -> Result<Vec<Movie>, AppError> {
    Ok(store.list_movies().await?)
}
