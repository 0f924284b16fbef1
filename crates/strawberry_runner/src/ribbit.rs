//! Ribbit host protocol: the embedding page can restart or end a run and asks
//! for the play duration.

use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use ribbit_bits::{BitDuration, BitMessage, BitParameters, BitResult, RibbitMessage};
use runner_core::InputEvent;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

use crate::session::{Runner, RunnerSet};

pub static RIBBIT_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<RibbitMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(target_arch = "wasm32")]
fn listen_ribbit_messages() {
    let Some(window) = web_sys::window() else {
        error!("No browser window, Ribbit messages will not be received");
        return;
    };

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Ok(message) = serde_wasm_bindgen::from_value::<RibbitMessage>(event.data()) else {
            error!("Could not parse ribbit message {:?}", event.data());
            return;
        };
        RIBBIT_MESSAGE_QUEUE.lock().push(message);
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Could not listen to Ribbit messages. {err:?}");
        return;
    }

    // the listener lives as long as the page
    closure.forget();
}

#[cfg(target_arch = "wasm32")]
fn send_bit_message(message: BitMessage) {
    let Some(window) = web_sys::window() else {
        error!("{message:?} not sent, no browser window.");
        return;
    };
    let Ok(value) = serde_wasm_bindgen::to_value(&message) else {
        error!("Could not serialize {message:?}");
        return;
    };
    let Ok(Some(parent_window)) = window.parent() else {
        error!("{message:?} not sent, parent_window not found.");
        return;
    };

    if let Err(err) = parent_window.post_message(&value, "*") {
        error!("Could not post message {value:?}. {err:?}");
    }
}

// Natively there is no embedding page; the message is only logged.
#[cfg(not(target_arch = "wasm32"))]
fn send_bit_message(message: BitMessage) {
    info!("Bit message: {message:?}");
}

/// What the host gets when it ends the bit.
fn end_result(runner: &mut Runner) -> BitResult {
    runner.finish();
    BitResult::HighestScore(runner.session().display_score().into())
}

fn restart(runner: &mut Runner) {
    info!("Restarting the runner");
    runner.finish();
    runner.handle_input(InputEvent::Start);
}

fn process_ribbit_messages(mut runner: ResMut<Runner>) {
    let messages: Vec<RibbitMessage> = RIBBIT_MESSAGE_QUEUE.lock().drain(..).collect();

    for message in messages {
        match message {
            RibbitMessage::End => {
                info!("Ending the runner");
                let result = end_result(&mut runner);
                send_bit_message(BitMessage::End(result));
            }
            RibbitMessage::Parameters => {
                let duration = BitDuration::max_duration();
                send_bit_message(BitMessage::Parameters(BitParameters { duration }));
            }
            RibbitMessage::Restart => restart(&mut runner),
            // runs start from player input
            RibbitMessage::Start => {}
        }
    }
}

fn ready() {
    send_bit_message(BitMessage::Ready);
}

pub struct RibbitPlugin;

impl Plugin for RibbitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            process_ribbit_messages
                .after(RunnerSet::Apply)
                .before(RunnerSet::Publish)
                .run_if(resource_exists::<Runner>),
        )
        .add_systems(PostStartup, ready);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_ribbit_messages);
    }
}
