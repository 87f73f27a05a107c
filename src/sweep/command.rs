//! Toggle command handler: sender classification, permission gate, messages.

use crate::host::api::{Host, PlayerId};
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::sweep::SWEEP_CAPABILITY;
use crate::sweep::registry::SweepRegistry;

/// Who invoked the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    /// Interactive player actor.
    Player(PlayerId),
    /// Console or any other non-player sender.
    Console,
}

pub(crate) const MSG_PLAYERS_ONLY: &str = "This command can only be used by a player.";
pub(crate) const MSG_NO_PERMISSION: &str = "You do not have permission to use this command.";
pub(crate) const MSG_ENABLED: &str = "[ChunkSweeper] Cleanup mode enabled: all containers and \
     item displays within your loaded range will be emptied automatically.";
pub(crate) const MSG_DISABLED: &str = "[ChunkSweeper] Cleanup mode disabled.";

/// Handle the cleanup-mode toggle command.
///
/// Always returns `true` (the command is "handled"); invalid contexts are
/// answered with a one-line message and leave the registry untouched.
pub fn handle_toggle(
    host: &dyn Host,
    registry: &SweepRegistry,
    logger: &ActivityLoggerHandle,
    sender: CommandSender,
) -> bool {
    let CommandSender::Player(player) = sender else {
        host.console_message(MSG_PLAYERS_ONLY);
        return true;
    };

    if !host.has_permission(player, SWEEP_CAPABILITY) {
        host.send_message(player, MSG_NO_PERMISSION);
        return true;
    }

    let name = display_name(host, player);
    if registry.toggle(player) {
        host.send_message(player, MSG_ENABLED);
        logger.send(ActivityEvent::ModeEnabled { player: name });
    } else {
        host.send_message(player, MSG_DISABLED);
        logger.send(ActivityEvent::ModeDisabled { player: name });
    }
    true
}

pub(crate) fn display_name(host: &dyn Host, player: PlayerId) -> String {
    host.player_name(player)
        .unwrap_or_else(|| player.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::api::ChunkPos;
    use crate::host::sim::SimHost;
    use crate::logger::activity::ActivityLoggerHandle;

    fn test_logger() -> ActivityLoggerHandle {
        ActivityLoggerHandle::disconnected()
    }

    #[test]
    fn console_sender_is_rejected_but_handled() {
        let host = SimHost::new();
        let registry = SweepRegistry::new();
        let handled = handle_toggle(&host, &registry, &test_logger(), CommandSender::Console);
        assert!(handled);
        assert!(registry.is_empty());
        assert_eq!(host.console_messages(), vec![MSG_PLAYERS_ONLY.to_string()]);
    }

    #[test]
    fn missing_permission_is_denied_without_registry_change() {
        let host = SimHost::new();
        let registry = SweepRegistry::new();
        let player = host.add_player("steve", ChunkPos::new(0, 0), &[]);

        let handled = handle_toggle(
            &host,
            &registry,
            &test_logger(),
            CommandSender::Player(player),
        );
        assert!(handled);
        assert!(!registry.is_enabled(player));
        assert_eq!(host.messages_for(player), vec![MSG_NO_PERMISSION.to_string()]);
    }

    #[test]
    fn toggle_on_then_off_restores_membership() {
        let host = SimHost::new();
        let registry = SweepRegistry::new();
        let player = host.add_player("alex", ChunkPos::new(0, 0), &[SWEEP_CAPABILITY]);
        let logger = test_logger();

        handle_toggle(&host, &registry, &logger, CommandSender::Player(player));
        assert!(registry.is_enabled(player));
        handle_toggle(&host, &registry, &logger, CommandSender::Player(player));
        assert!(!registry.is_enabled(player));

        let messages = host.messages_for(player);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("enabled"));
        assert!(messages[1].contains("disabled"));
    }
}
