use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;
use crate::models::domain::quiz_question::{QuestionId, QuestionOptions};
use crate::models::domain::{Question, Quiz, QuizId, QuizSummary};

/// Question as served by the backend. `correct_answer` and `explanation` are
/// withheld on the student endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
	pub id: i64,
	pub quiz_id: Option<i64>,
	pub question_text: Option<String>,
	pub option_a: Option<String>,
	pub option_b: Option<String>,
	pub option_c: Option<String>,
	pub option_d: Option<String>,
	pub correct_answer: Option<String>,
	pub image_url: Option<String>,
	pub explanation: Option<String>,
	#[validate(range(min = 1))]
	pub marks: Option<i32>,
}

impl QuestionDto {
	pub fn options(&self) -> QuestionOptions {
		QuestionOptions {
			a: self.option_a.clone(),
			b: self.option_b.clone(),
			c: self.option_c.clone(),
			d: self.option_d.clone(),
		}
	}
}

impl TryFrom<QuestionDto> for Question {
	type Error = AppError;

	fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
		dto.validate()?;

		Ok(Question {
			id: QuestionId(dto.id),
			options: dto.options(),
			text: dto.question_text.unwrap_or_default(),
			// Backend default when a teacher leaves marks blank
			marks: dto.marks.map_or(1, |m| m as u32),
			image_url: dto.image_url.filter(|url| !url.trim().is_empty()),
		})
	}
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
	pub id: i64,
	pub title: Option<String>,
	pub description: Option<String>,
	pub course_id: Option<i64>,
	pub course_name: Option<String>,
	pub is_published: Option<bool>,
	pub total_marks: Option<i32>,
	/// Minutes.
	#[validate(range(min = 1))]
	pub duration: Option<i32>,
	pub question_count: Option<i32>,
	pub questions: Option<Vec<QuestionDto>>,
	pub has_attempted: Option<bool>,
	pub best_score: Option<i32>,
}

impl TryFrom<QuizDto> for Quiz {
	type Error = AppError;

	fn try_from(dto: QuizDto) -> Result<Self, Self::Error> {
		dto.validate()?;

		let duration_minutes = dto.duration.ok_or_else(|| {
			AppError::ValidationError(format!("Quiz {} has no duration", dto.id))
		})? as u32;

		let questions = dto
			.questions
			.unwrap_or_default()
			.into_iter()
			.map(Question::try_from)
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Quiz {
			id: QuizId(dto.id),
			title: dto.title.unwrap_or_default(),
			description: dto.description,
			course_id: dto.course_id,
			course_name: dto.course_name,
			duration_minutes,
			questions,
		})
	}
}

impl From<QuizDto> for QuizSummary {
	fn from(dto: QuizDto) -> Self {
		let question_count = dto
			.question_count
			.map(|c| c.max(0) as u32)
			.or_else(|| dto.questions.as_ref().map(|q| q.len() as u32))
			.unwrap_or(0);

		QuizSummary {
			id: QuizId(dto.id),
			title: dto.title.unwrap_or_default(),
			description: dto.description,
			course_id: dto.course_id,
			course_name: dto.course_name,
			duration_minutes: dto.duration.filter(|d| *d > 0).map(|d| d as u32),
			total_marks: dto.total_marks.map_or(0, |m| m.max(0) as u32),
			question_count,
			has_attempted: dto.has_attempted.unwrap_or(false),
			best_score: dto.best_score.map(|s| s.max(0) as u32),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::domain::OptionKey;

	const STUDENT_QUIZ_JSON: &str = r#"{
		"id": 7,
		"title": "Borrow Checker",
		"description": "Lifetimes and loans",
		"courseId": 3,
		"courseName": "Rust 101",
		"isPublished": true,
		"totalMarks": 3,
		"duration": 15,
		"questionCount": 2,
		"questions": [
			{"id": 11, "quizId": 7, "questionText": "What is &mut?", "optionA": "Unique borrow",
			 "optionB": "Shared borrow", "optionC": null, "optionD": "Box",
			 "correctAnswer": null, "imageUrl": "", "explanation": null, "marks": 1},
			{"id": 12, "quizId": 7, "questionText": "Is Rc Send?", "optionA": "Yes",
			 "optionB": "No", "marks": null}
		],
		"hasAttempted": false,
		"bestScore": null
	}"#;

	#[test]
	fn student_quiz_payload_converts_to_snapshot() {
		let dto: QuizDto = serde_json::from_str(STUDENT_QUIZ_JSON).expect("payload should parse");
		let quiz = Quiz::try_from(dto).expect("payload should be valid");

		assert_eq!(quiz.id, QuizId(7));
		assert_eq!(quiz.duration_minutes, 15);
		assert_eq!(quiz.questions.len(), 2);
		assert_eq!(quiz.questions[0].options.get(OptionKey::A), Some("Unique borrow"));
		assert_eq!(quiz.questions[0].options.get(OptionKey::C), None);
		assert_eq!(quiz.questions[0].image_url, None);
		assert_eq!(quiz.questions[1].marks, 1);
		assert_eq!(quiz.total_marks(), 2);
	}

	#[test]
	fn quiz_without_duration_is_rejected() {
		let mut dto: QuizDto = serde_json::from_str(STUDENT_QUIZ_JSON).unwrap();
		dto.duration = None;

		assert!(matches!(
			Quiz::try_from(dto),
			Err(AppError::ValidationError(_))
		));
	}

	#[test]
	fn zero_duration_fails_validation() {
		let mut dto: QuizDto = serde_json::from_str(STUDENT_QUIZ_JSON).unwrap();
		dto.duration = Some(0);

		assert!(Quiz::try_from(dto).is_err());
	}

	#[test]
	fn negative_marks_fail_validation() {
		let mut dto: QuizDto = serde_json::from_str(STUDENT_QUIZ_JSON).unwrap();
		if let Some(questions) = dto.questions.as_mut() {
			questions[0].marks = Some(-2);
		}

		assert!(Quiz::try_from(dto).is_err());
	}

	#[test]
	fn missing_questions_produce_an_empty_quiz() {
		let mut dto: QuizDto = serde_json::from_str(STUDENT_QUIZ_JSON).unwrap();
		dto.questions = None;

		let quiz = Quiz::try_from(dto).expect("empty quiz is still a quiz");
		assert!(quiz.questions.is_empty());
	}

	#[test]
	fn list_payload_converts_to_summary() {
		let json = r#"{"id": 9, "title": "Traits", "courseName": null, "totalMarks": 10,
			"duration": 20, "questionCount": 5, "hasAttempted": true, "bestScore": 8}"#;
		let dto: QuizDto = serde_json::from_str(json).unwrap();

		let summary = QuizSummary::from(dto);

		assert_eq!(summary.id, QuizId(9));
		assert_eq!(summary.question_count, 5);
		assert_eq!(summary.duration_minutes, Some(20));
		assert!(summary.has_attempted);
		assert_eq!(summary.best_score, Some(8));
	}
}
