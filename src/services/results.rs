//! Derived statistics over recorded answer submissions.
//!
//! Both aggregations are pure reads over a game's submission batches. The
//! final results are computed once when the game transitions to
//! FINAL_RESULTS and served verbatim afterwards, so every viewer sees the
//! same snapshot.

use std::collections::HashMap;

use crate::state::game::{Game, PlayerScore, Question, QuestionResults, ResultsFinal};

/// Compute the statistics for one question of a game.
///
/// A question nobody answered yields the zero/empty defaults. The latency
/// reference is the batch's `question_start_time`, which is recorded when
/// the first submission arrives rather than at the QUESTION_OPEN instant.
pub fn question_results(game: &Game, question: &Question) -> QuestionResults {
    let Some(batch) = game.submission_batch(question.question_id) else {
        return QuestionResults::empty(question.question_id);
    };

    let total = batch.submissions.len();
    if total == 0 {
        return QuestionResults::empty(question.question_id);
    }

    let players_correct: Vec<String> = batch
        .submissions
        .iter()
        .filter(|submission| submission.is_correct)
        .filter_map(|submission| game.player_name(submission.player_id))
        .map(str::to_owned)
        .collect();

    let correct_count = batch
        .submissions
        .iter()
        .filter(|submission| submission.is_correct)
        .count();
    let percent_correct = ((correct_count as f64 / total as f64) * 100.0).round() as u32;

    let start_secs = batch.question_start_time / 1000;
    let total_time: u64 = batch
        .submissions
        .iter()
        .map(|submission| submission.submitted_at.saturating_sub(start_secs))
        .sum();
    let average_answer_time = (total_time as f64 / total as f64).round() as u64;

    QuestionResults {
        question_id: question.question_id,
        players_correct,
        average_answer_time,
        percent_correct,
    }
}

/// Compute the final leaderboard and the statistics of every question.
///
/// Every joined player appears in the ranking, scoring the sum of points
/// awarded across their submissions (zero without any). Ordering is score
/// descending with ties broken by name ascending, case-sensitively.
/// Questions that were never opened yield the zero/empty defaults.
pub fn final_results(game: &Game) -> ResultsFinal {
    let mut scores: HashMap<u64, u32> = game
        .players
        .iter()
        .map(|player| (player.player_id, 0))
        .collect();

    for batch in &game.answers {
        for submission in &batch.submissions {
            if let Some(score) = scores.get_mut(&submission.player_id) {
                *score += submission.points_awarded;
            }
        }
    }

    let mut users_ranked_by_score: Vec<PlayerScore> = game
        .players
        .iter()
        .map(|player| PlayerScore {
            name: player.player_name.clone(),
            score: scores.get(&player.player_id).copied().unwrap_or(0),
        })
        .collect();
    users_ranked_by_score.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));

    let question_results = game
        .snapshot
        .questions
        .iter()
        .map(|question| self::question_results(game, question))
        .collect();

    ResultsFinal {
        users_ranked_by_score,
        question_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{
        AnswerOption, Player, PlayerAnswer, Question, QuizSnapshot,
    };

    fn question(id: u64, points: u32) -> Question {
        Question {
            question_id: id,
            question: format!("Question {id}?"),
            time_limit: 30,
            points,
            thumbnail_url: "https://example.com/q.png".into(),
            answer_options: vec![
                AnswerOption {
                    answer_id: id * 10,
                    answer: "right".into(),
                    correct: true,
                    colour: "red".into(),
                },
                AnswerOption {
                    answer_id: id * 10 + 1,
                    answer: "wrong".into(),
                    correct: false,
                    colour: "blue".into(),
                },
            ],
        }
    }

    fn game_with_questions(questions: Vec<Question>) -> Game {
        let snapshot = QuizSnapshot {
            quiz_id: 1,
            name: "Capitals".into(),
            description: String::new(),
            time_created: 0,
            time_last_edited: 0,
            questions,
        };
        Game::new(1, snapshot, 0, 0)
    }

    fn join(game: &mut Game, name: &str) -> u64 {
        let player_id = game.players.len() as u64 + 1;
        game.players.push(Player {
            player_id,
            player_name: name.into(),
            game_id: game.game_id,
        });
        player_id
    }

    fn record(
        game: &mut Game,
        question_id: u64,
        start_millis: u64,
        player_id: u64,
        submitted_at: u64,
        is_correct: bool,
        points_awarded: u32,
    ) {
        let batch = game.submission_batch_mut(question_id, start_millis);
        batch.submissions.push(PlayerAnswer {
            player_id,
            answer_ids: vec![question_id * 10],
            submitted_at,
            is_correct,
            points_awarded,
        });
    }

    #[test]
    fn unanswered_question_yields_defaults() {
        let game = game_with_questions(vec![question(1, 5)]);
        let results = question_results(&game, &game.snapshot.questions[0]);
        assert_eq!(results, QuestionResults::empty(1));
    }

    #[test]
    fn percent_correct_rounds_to_nearest() {
        let mut game = game_with_questions(vec![question(1, 5)]);
        let ada = join(&mut game, "ada");
        let bob = join(&mut game, "bob");
        let eve = join(&mut game, "eve");
        record(&mut game, 1, 10_000, ada, 12, true, 5);
        record(&mut game, 1, 10_000, bob, 13, false, 0);
        record(&mut game, 1, 10_000, eve, 14, false, 0);

        let results = question_results(&game, &game.snapshot.questions[0]);
        // 1 of 3 correct -> 33.33 rounds down.
        assert_eq!(results.percent_correct, 33);
        assert_eq!(results.players_correct, vec!["ada".to_string()]);
    }

    #[test]
    fn average_answer_time_is_rounded_mean_from_batch_start() {
        let mut game = game_with_questions(vec![question(1, 5)]);
        let ada = join(&mut game, "ada");
        let bob = join(&mut game, "bob");
        // Batch opened at t=10s; answers at 12s and 15s -> mean 3.5 -> 4.
        record(&mut game, 1, 10_000, ada, 12, true, 5);
        record(&mut game, 1, 10_000, bob, 15, true, 5);

        let results = question_results(&game, &game.snapshot.questions[0]);
        assert_eq!(results.average_answer_time, 4);
        assert_eq!(results.percent_correct, 100);
    }

    #[test]
    fn players_correct_keeps_submission_order() {
        let mut game = game_with_questions(vec![question(1, 5)]);
        let ada = join(&mut game, "ada");
        let bob = join(&mut game, "bob");
        record(&mut game, 1, 0, bob, 1, true, 5);
        record(&mut game, 1, 0, ada, 2, true, 5);

        let results = question_results(&game, &game.snapshot.questions[0]);
        assert_eq!(
            results.players_correct,
            vec!["bob".to_string(), "ada".to_string()]
        );
    }

    #[test]
    fn scores_sum_points_across_questions() {
        let mut game = game_with_questions(vec![question(1, 5), question(2, 10)]);
        let ada = join(&mut game, "ada");
        record(&mut game, 1, 0, ada, 1, true, 5);
        record(&mut game, 2, 0, ada, 1, false, 0);

        let results = final_results(&game);
        assert_eq!(results.users_ranked_by_score.len(), 1);
        assert_eq!(results.users_ranked_by_score[0].score, 5);
        assert_eq!(results.question_results.len(), 2);
    }

    #[test]
    fn ranking_sorts_by_score_then_name() {
        let mut game = game_with_questions(vec![question(1, 5)]);
        let zoe = join(&mut game, "zoe");
        let ada = join(&mut game, "ada");
        let bob = join(&mut game, "bob");
        record(&mut game, 1, 0, zoe, 1, true, 5);
        record(&mut game, 1, 0, ada, 1, true, 5);
        record(&mut game, 1, 0, bob, 2, false, 0);

        let results = final_results(&game);
        let names: Vec<&str> = results
            .users_ranked_by_score
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["ada", "zoe", "bob"]);
    }

    #[test]
    fn silent_players_rank_with_zero_score() {
        let mut game = game_with_questions(vec![question(1, 5)]);
        let ada = join(&mut game, "ada");
        join(&mut game, "mute");
        record(&mut game, 1, 0, ada, 1, true, 5);

        let results = final_results(&game);
        assert_eq!(results.users_ranked_by_score[1].name, "mute");
        assert_eq!(results.users_ranked_by_score[1].score, 0);
    }

    #[test]
    fn unopened_questions_report_defaults_in_final_results() {
        let mut game = game_with_questions(vec![question(1, 5), question(2, 10)]);
        let ada = join(&mut game, "ada");
        record(&mut game, 1, 0, ada, 1, true, 5);

        let results = final_results(&game);
        assert_eq!(results.question_results[1], QuestionResults::empty(2));
    }
}
