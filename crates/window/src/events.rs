use tracing::{info, trace};
use winit::{
    event::{
        ElementState, KeyEvent,
        WindowEvent::{self, *},
    },
    event_loop::EventLoopWindowTarget,
    keyboard::{Key, NamedKey},
};

/// Whether the event asks the application to shut down.
pub fn requests_exit(event: &WindowEvent) -> bool {
    matches!(
        event,
        CloseRequested
            | KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    logical_key: Key::Named(NamedKey::Escape),
                    ..
                },
                ..
            }
    )
}

pub fn windowevents(event: &WindowEvent, elwt: &EventLoopWindowTarget<()>) {
    if requests_exit(event) {
        info!("Requested close: Exiting window");
        elwt.exit();
        return;
    }

    match event {
        Resized(size) => {
            trace!("Resized to {}x{}", size.width, size.height);
        }
        Destroyed => {
            info!("Window destroyed");
            elwt.exit();
        }
        RedrawRequested => {
            // nothing is rendered yet
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_exits() {
        assert!(requests_exit(&CloseRequested));
        assert!(!requests_exit(&RedrawRequested));
        assert!(!requests_exit(&Focused(true)));
    }
}
