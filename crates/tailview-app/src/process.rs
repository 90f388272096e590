//! Message processing: runs the TEA update loop and dispatches actions

use crate::actions::handle_actions;
use crate::engine_event::EngineEvent;
use crate::handler;
use crate::host::Host;
use crate::message::Message;
use crate::state::AppState;
use crate::surface::RenderSurface;

/// Process a message through the TEA update function.
///
/// Follow-up messages are processed to completion before returning. Returns
/// the events produced by the applied actions, in order.
pub fn process_message<S, H>(
    state: &mut AppState,
    message: Message,
    surface: &mut S,
    host: &mut H,
) -> Vec<EngineEvent>
where
    S: RenderSurface + ?Sized,
    H: Host + ?Sized,
{
    let mut events = Vec::new();

    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        events.extend(handle_actions(result.actions, surface, host));

        // Continue with follow-up message
        msg = result.message;
    }

    events
}
