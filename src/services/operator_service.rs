use crate::{
    dto::views::{OperatorView, ScoreboardEntry},
    state::{
        SharedState,
        game::{GameMode, GameState, Minigame, Participant},
        media::rendered_media,
    },
};

/// Build the operator display projection from the current snapshot.
pub fn view(state: &SharedState) -> OperatorView {
    project(&state.snapshot())
}

/// Operator display projection of `state`.
pub fn project(state: &GameState) -> OperatorView {
    let (title, subtitle) = headline(state.mode, state.current_game);
    OperatorView {
        mode: state.mode,
        current_game: state.current_game,
        title: title.to_string(),
        subtitle,
        scoreboard: scoreboard(state),
        media: rendered_media(state.mode, state.selected_media.as_ref()).cloned(),
        is_fullscreen: state.is_fullscreen,
    }
}

fn headline(mode: GameMode, current_game: Option<Minigame>) -> (&'static str, String) {
    match mode {
        GameMode::Lobby => ("Welcome to Game Night!", "Ready to start the fun?".into()),
        GameMode::Karaoke => ("Karaoke Time!", "Sing your heart out!".into()),
        GameMode::GuessLyrics => ("Guess the Lyrics!", "Listen and guess the song!".into()),
        GameMode::GuessImage => ("Guess the Picture!", "What do you see?".into()),
        GameMode::Scores => ("Current Game Scores", round_subtitle(current_game)),
        GameMode::FinalScores => (
            "Final Tournament Scores",
            "Total scores from all games!".into(),
        ),
        GameMode::Ended => ("Thanks for Playing!", "Hope you had fun!".into()),
    }
}

fn round_subtitle(current_game: Option<Minigame>) -> String {
    match current_game {
        Some(game) => format!("{} Results", game_tag(game).to_uppercase()),
        None => "Round Results".into(),
    }
}

fn game_tag(game: Minigame) -> &'static str {
    match game {
        Minigame::Karaoke => "karaoke",
        Minigame::GuessLyrics => "guessLyrics",
        Minigame::GuessImage => "guessImage",
    }
}

/// Participants ranked for the current mode. Ties keep insertion order.
fn scoreboard(state: &GameState) -> Vec<ScoreboardEntry> {
    let mut participants: Vec<&Participant> = state.participants.values().collect();
    match state.mode {
        GameMode::Scores => participants.sort_by(|a, b| b.current_score.cmp(&a.current_score)),
        GameMode::FinalScores => participants.sort_by(|a, b| b.total_score.cmp(&a.total_score)),
        _ => {}
    }

    participants
        .into_iter()
        .enumerate()
        .map(|(index, participant)| ScoreboardEntry {
            rank: index + 1,
            id: participant.id.clone(),
            name: participant.name.clone(),
            current_score: participant.current_score,
            total_score: participant.total_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        game::{Participant, ScoreUpdate},
        media::{MediaKind, SelectedMedia},
    };

    fn scored(state: GameState, id: &str, points: i64) -> GameState {
        state
            .score_update(&ScoreUpdate {
                participant_id: id.into(),
                points,
                reason: String::new(),
                game_type: Minigame::Karaoke,
            })
            .unwrap()
    }

    fn three_teams() -> GameState {
        GameState::with_participants([
            Participant::new("a", "A"),
            Participant::new("b", "B"),
            Participant::new("c", "C"),
        ])
    }

    fn ids(view: &OperatorView) -> Vec<&str> {
        view.scoreboard.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn titles_follow_mode() {
        let state = three_teams();
        assert_eq!(project(&state).title, "Welcome to Game Night!");
        let karaoke = state.mode_change(GameMode::Karaoke, None);
        assert_eq!(project(&karaoke).title, "Karaoke Time!");
        let scores = karaoke.mode_change(GameMode::Scores, None);
        let view = project(&scores);
        assert_eq!(view.title, "Current Game Scores");
        assert_eq!(view.subtitle, "KARAOKE Results");
        assert_eq!(
            project(&state.mode_change(GameMode::Scores, None)).subtitle,
            "Round Results"
        );
        assert_eq!(
            project(&state.mode_change(GameMode::Ended, None)).title,
            "Thanks for Playing!"
        );
    }

    #[test]
    fn scores_rank_by_round_score_with_stable_ties() {
        let state = scored(scored(three_teams(), "b", 5), "c", 5);
        let state = scored(state, "a", 1).mode_change(GameMode::Scores, None);
        let view = project(&state);
        assert_eq!(ids(&view), ["b", "c", "a"]);
        assert_eq!(view.scoreboard[0].rank, 1);
        assert_eq!(view.scoreboard[2].rank, 3);
    }

    #[test]
    fn final_scores_rank_by_total() {
        let state = scored(three_teams(), "c", 7).finalize_game();
        let state = scored(state, "a", 20).mode_change(GameMode::FinalScores, None);
        assert_eq!(ids(&project(&state)), ["c", "a", "b"]);
    }

    #[test]
    fn other_modes_keep_insertion_order() {
        let state = scored(three_teams(), "c", 9);
        assert_eq!(ids(&project(&state)), ["a", "b", "c"]);
    }

    #[test]
    fn media_only_renders_in_matching_mode() {
        let state = three_teams()
            .media_change(Some(SelectedMedia::new(MediaKind::Music, "/assets/music/x.mp3")));
        assert!(project(&state.mode_change(GameMode::Karaoke, None)).media.is_none());
        let lyrics = project(&state.mode_change(GameMode::GuessLyrics, None));
        assert_eq!(lyrics.media.unwrap().url, "/assets/music/x.mp3");
    }
}
