use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{Level, event, instrument};

use handle_errors::Error;

use crate::store::Store;
use crate::types::{
    question::{Question, QuestionId},
    quiz::QuizScope,
};

/// How the quiz decides to stop handing out questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizPolicy {
    /// Scopes holding fewer questions than this never produce one. `0`
    /// turns the check off.
    pub min_questions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraw {
    pub question: Option<Question>,
    /// Unseen questions available before the pick.
    pub remaining: usize,
}

/// Picks one candidate uniformly at random.
pub fn select_next<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

#[instrument(skip(store))]
pub async fn next_question(
    store: &Store,
    scope: QuizScope,
    previous: &[QuestionId],
    policy: QuizPolicy,
) -> Result<QuizDraw, Error> {
    if policy.min_questions > 0 {
        let size = store.count_in_scope(scope).await?;
        if size < i64::from(policy.min_questions) {
            event!(Level::INFO, size, "too few questions in scope for a quiz");
            return Ok(QuizDraw {
                question: None,
                remaining: usize::try_from(size).unwrap_or_default(),
            });
        }
    }

    let candidates = store.quiz_candidates(scope, previous).await?;
    let question = select_next(&candidates, &mut rand::thread_rng());
    Ok(QuizDraw {
        question,
        remaining: candidates.len(),
    })
}

#[cfg(test)]
mod quiz_tests {
    use super::*;
    use crate::types::category::CategoryId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn science() -> QuizScope {
        QuizScope::Category(CategoryId(1))
    }

    #[test]
    fn empty_candidates_give_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_next(&[], &mut rng), None);
    }

    #[tokio::test]
    async fn single_remaining_question_is_returned() {
        let store = Store::in_memory().unwrap();
        let previous: Vec<QuestionId> = [20, 21, 22, 27, 28].into_iter().map(QuestionId).collect();

        let draw = next_question(&store, science(), &previous, QuizPolicy::default())
            .await
            .unwrap();

        assert_eq!(draw.question.map(|q| q.id), Some(QuestionId(29)));
        assert_eq!(draw.remaining, 1);
    }

    #[tokio::test]
    async fn exhausted_category_gives_nothing() {
        let store = Store::in_memory().unwrap();
        let previous = [QuestionId(10), QuestionId(11)];

        let draw = next_question(
            &store,
            QuizScope::Category(CategoryId(6)),
            &previous,
            QuizPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(draw.question, None);
        assert_eq!(draw.remaining, 0);
    }

    #[tokio::test]
    async fn never_repeats_and_eventually_runs_out() {
        let store = Store::in_memory().unwrap();
        let total = store.count_questions().await.unwrap() as usize;
        let mut previous: Vec<QuestionId> = Vec::new();

        while let Some(question) =
            next_question(&store, QuizScope::All, &previous, QuizPolicy::default())
                .await
                .unwrap()
                .question
        {
            assert!(!previous.contains(&question.id));
            previous.push(question.id);
            assert!(previous.len() <= total);
        }

        assert_eq!(previous.len(), total);
    }

    #[tokio::test]
    async fn unknown_category_gives_nothing() {
        let store = Store::in_memory().unwrap();
        let draw = next_question(
            &store,
            QuizScope::Category(CategoryId(99)),
            &[],
            QuizPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(draw.question, None);
        assert_eq!(draw.remaining, 0);
    }

    #[tokio::test]
    async fn threshold_blocks_small_categories() {
        let store = Store::in_memory().unwrap();
        let policy = QuizPolicy { min_questions: 6 };

        let sports = next_question(&store, QuizScope::Category(CategoryId(6)), &[], policy)
            .await
            .unwrap();
        assert_eq!(sports.question, None);
        assert_eq!(sports.remaining, 2);

        let science = next_question(&store, science(), &[], policy).await.unwrap();
        assert!(science.question.is_some());
    }
}
