use crate::{
    app_state::AppState,
    errors::AppResult,
    handlers::terminal,
    models::domain::QuizId,
    services::quiz_service::QuizFilter,
};

pub async fn list_quizzes(state: &AppState, filter: QuizFilter, search: Option<&str>) -> AppResult<()> {
    let quizzes = state.quiz_service.list_available(filter, search).await?;
    print!("{}", terminal::render_summaries(&quizzes));
    Ok(())
}

pub async fn list_course_quizzes(state: &AppState, course_id: i64) -> AppResult<()> {
    let quizzes = state.quiz_service.list_by_course(course_id).await?;
    print!("{}", terminal::render_summaries(&quizzes));
    Ok(())
}

pub async fn list_attempts(state: &AppState) -> AppResult<()> {
    let attempts = state.quiz_service.history().await?;
    print!("{}", terminal::render_history(&attempts));
    Ok(())
}

pub async fn show_result(state: &AppState, quiz_id: QuizId) -> AppResult<()> {
    let result = state.quiz_service.latest_result(quiz_id).await?;
    print!("{}", terminal::render_result(&result));
    Ok(())
}
