use tracing::info;

use super::model::IdPair;

pub const DOWNLOAD_COMMAND: &str = "+workshop_download_item";

/// One console directive. The leading space lets directives be appended to a prefix.
pub fn directive(game_id: &str, workshop_id: &str) -> String {
    format!(" {DOWNLOAD_COMMAND} {game_id} {workshop_id} validate")
}

/// Build the directive string for `pairs`, in order.
///
/// With `bscim` set, every item is followed by `repeat` extra directives that use the game
/// ID of the *first* pair, forcing the download into that app's context.
pub fn generate_script(pairs: &[IdPair], repeat: u32, bscim: bool) -> String {
    let Some(first) = pairs.first() else {
        return String::new();
    };
    let mut script = String::new();
    for (idx, pair) in pairs.iter().enumerate() {
        script.push_str(&directive(&pair.game_id, &pair.workshop_id));
        if bscim {
            for _ in 0..repeat {
                script.push_str(&directive(&first.game_id, &pair.workshop_id));
            }
            info!("BSIM Treatment given to item #{} repeated {} time/s.", idx + 1, repeat);
        }
    }
    script
}

pub fn directive_count(script: &str) -> usize {
    script.matches(DOWNLOAD_COMMAND).count()
}
