//! The lesson/quiz catalog.
//!
//! Content is read-only fixture data: one JSON file per lesson or quiz.
//! The built-in curriculum is compiled into the binary; a content directory
//! can be configured to replace it. Lessons and quizzes are keyed by stable
//! slug ids, and a quiz's prerequisite references a lesson id.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A lesson: a title and an ordered sequence of paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub content: Vec<String>,
}

/// A single multiple-choice question. `answer` is the full text of the
/// correct option, not an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// A quiz, optionally gated on completing a lesson first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    /// Lesson id that must be completed before taking this quiz.
    #[serde(default)]
    pub lesson: Option<String>,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Maximum attainable score: one point per question.
    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32
    }
}

/// All known lessons and quizzes, in curriculum order.
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    quizzes: Vec<Quiz>,
}

const BUILTIN_LESSONS: &[&str] = &[
    include_str!("../../content/lessons/intro_to_python.json"),
    include_str!("../../content/lessons/variables_and_data_types.json"),
    include_str!("../../content/lessons/conditionals.json"),
    include_str!("../../content/lessons/loops.json"),
    include_str!("../../content/lessons/functions.json"),
];

const BUILTIN_QUIZZES: &[&str] = &[
    include_str!("../../content/quizzes/intro_to_python_quiz.json"),
    include_str!("../../content/quizzes/variables_and_data_types_quiz.json"),
    include_str!("../../content/quizzes/conditionals_quiz.json"),
    include_str!("../../content/quizzes/loops_quiz.json"),
    include_str!("../../content/quizzes/functions_quiz.json"),
];

impl Catalog {
    /// The compiled-in Python curriculum.
    pub fn builtin() -> Result<Self> {
        let lessons = BUILTIN_LESSONS
            .iter()
            .map(|raw| serde_json::from_str(raw).context("Failed to parse built-in lesson"))
            .collect::<Result<Vec<Lesson>>>()?;
        let quizzes = BUILTIN_QUIZZES
            .iter()
            .map(|raw| serde_json::from_str(raw).context("Failed to parse built-in quiz"))
            .collect::<Result<Vec<Quiz>>>()?;
        Self::new(lessons, quizzes)
    }

    /// Load a catalog from `<dir>/lessons/*.json` and `<dir>/quizzes/*.json`.
    /// Files are ordered by name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let lessons = load_fixtures::<Lesson>(&dir.join("lessons"))?;
        let quizzes = load_fixtures::<Quiz>(&dir.join("quizzes"))?;
        Self::new(lessons, quizzes)
    }

    fn new(lessons: Vec<Lesson>, quizzes: Vec<Quiz>) -> Result<Self> {
        let catalog = Self { lessons, quizzes };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids must be unique, and every quiz prerequisite must name a real lesson.
    fn validate(&self) -> Result<()> {
        for (i, lesson) in self.lessons.iter().enumerate() {
            if self.lessons[..i].iter().any(|l| l.id == lesson.id) {
                bail!("duplicate lesson id '{}'", lesson.id);
            }
        }
        for (i, quiz) in self.quizzes.iter().enumerate() {
            if self.quizzes[..i].iter().any(|q| q.id == quiz.id) {
                bail!("duplicate quiz id '{}'", quiz.id);
            }
            if let Some(lesson_id) = &quiz.lesson {
                if self.lesson(lesson_id).is_none() {
                    bail!(
                        "quiz '{}' requires unknown lesson '{}'",
                        quiz.id,
                        lesson_id
                    );
                }
            }
        }
        Ok(())
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn quiz(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    /// Lesson ids in curriculum order, used as the goal's lesson plan.
    pub fn lesson_plan(&self) -> Vec<String> {
        self.lessons.iter().map(|l| l.id.clone()).collect()
    }
}

fn load_fixtures<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read content directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut fixtures = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let fixture = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        fixtures.push(fixture);
    }
    Ok(fixtures)
}
