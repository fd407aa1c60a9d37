#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        quiz_question::QuestionOptions, GradedResult, OptionKey, Question, QuestionId,
        QuestionResult, Quiz, QuizId, QuizSummary,
    };

    fn options(a: &str, b: &str, c: &str, d: &str) -> QuestionOptions {
        QuestionOptions {
            a: Some(a.to_string()),
            b: Some(b.to_string()),
            c: Some(c.to_string()),
            d: Some(d.to_string()),
        }
    }

    /// Quiz 1: Q1 worth 1 mark, Q2 worth 2 marks, sixty minutes.
    pub fn two_question_quiz() -> Quiz {
        Quiz {
            id: QuizId(1),
            title: "Ownership Basics".to_string(),
            description: Some("Moves, borrows and lifetimes".to_string()),
            course_id: Some(7),
            course_name: Some("Rust 101".to_string()),
            duration_minutes: 60,
            questions: vec![
                Question {
                    id: QuestionId(1),
                    text: "Which keyword moves a closure's captures?".to_string(),
                    options: options("move", "ref", "static", "box"),
                    marks: 1,
                    image_url: None,
                },
                Question {
                    id: QuestionId(2),
                    text: "How many mutable borrows may coexist?".to_string(),
                    options: options("Many", "Two", "One", "None"),
                    marks: 2,
                    image_url: None,
                },
            ],
        }
    }

    pub fn quiz_with_duration(minutes: u32) -> Quiz {
        Quiz {
            duration_minutes: minutes,
            ..two_question_quiz()
        }
    }

    pub fn empty_quiz() -> Quiz {
        Quiz {
            id: QuizId(2),
            title: "Placeholder".to_string(),
            description: None,
            course_id: None,
            course_name: None,
            duration_minutes: 10,
            questions: Vec::new(),
        }
    }

    pub fn quiz_summary(id: i64, title: &str, course: Option<&str>, attempted: bool) -> QuizSummary {
        QuizSummary {
            id: QuizId(id),
            title: title.to_string(),
            description: None,
            course_id: course.map(|_| 7),
            course_name: course.map(str::to_string),
            duration_minutes: Some(30),
            total_marks: 10,
            question_count: 5,
            has_attempted: attempted,
            best_score: attempted.then_some(6),
        }
    }

    /// Grading of `two_question_quiz` with Q1 answered correctly and Q2 skipped.
    pub fn graded_result_q1_correct() -> GradedResult {
        let quiz = two_question_quiz();
        GradedResult {
            attempt_id: Some(11),
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            student_name: Some("teststudent".to_string()),
            score: 1,
            total_marks: 3,
            correct_answers: 1,
            total_questions: 2,
            percentage: GradedResult::percentage_of(1, 3),
            submitted_at: None,
            question_results: vec![
                QuestionResult {
                    question_id: QuestionId(1),
                    question_text: quiz.questions[0].text.clone(),
                    options: quiz.questions[0].options.clone(),
                    selected_answer: Some(OptionKey::A),
                    correct_answer: Some(OptionKey::A),
                    is_correct: true,
                    marks: 1,
                    explanation: None,
                },
                QuestionResult {
                    question_id: QuestionId(2),
                    question_text: quiz.questions[1].text.clone(),
                    options: quiz.questions[1].options.clone(),
                    selected_answer: None,
                    correct_answer: Some(OptionKey::C),
                    is_correct: false,
                    marks: 2,
                    explanation: Some("Only one mutable borrow at a time".to_string()),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn fixture_quiz_matches_documented_shape() {
        let quiz = two_question_quiz();
        assert_eq!(quiz.total_marks(), 3);
        assert_eq!(quiz.duration_seconds(), 3600);
    }

    #[test]
    fn fixture_result_agrees_with_quiz() {
        let result = graded_result_q1_correct();
        assert_eq!(result.quiz_id, two_question_quiz().id);
        assert_eq!(result.question_results.len(), 2);
    }
}
