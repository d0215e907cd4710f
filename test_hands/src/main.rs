use dora_node_api::{arrow::array::BinaryArray, dora_core::config::DataId, DoraNode, Event};
use eyre::Result;
use hand_control_lib::synthetic::{fist, open_hand, pointing_hand, unlabeled_hand};
use hand_control_lib::{init_tracing, HandObservation};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Scripted scene: a name and the hands visible while it is held.
struct Scene {
    name: &'static str,
    hands: Vec<HandObservation>,
}

fn scenes() -> Vec<Scene> {
    vec![
        Scene {
            name: "no hands",
            hands: vec![],
        },
        Scene {
            name: "left open",
            hands: vec![open_hand("Left")],
        },
        Scene {
            name: "left fist, right straight",
            hands: vec![fist("Left"), open_hand("Right")],
        },
        Scene {
            name: "left open, right pointing left",
            hands: vec![open_hand("Left"), pointing_hand("Right", 0.15)],
        },
        Scene {
            name: "left open, right pointing right",
            hands: vec![open_hand("Left"), pointing_hand("Right", -0.15)],
        },
        Scene {
            name: "unlabeled hand",
            hands: vec![unlabeled_hand()],
        },
    ]
}

fn main() -> Result<()> {
    let _guard = init_tracing("test_hands");

    info!("Starting test_hands node");

    let (mut node, mut events) = DoraNode::init_from_env()?;
    let output_id = DataId::from("hands".to_owned());

    let scene_duration = std::env::var("SCENE_DURATION_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(4));

    let scenes = scenes();
    let mut scene_index = 0;
    let mut scene_started = Instant::now();

    info!("Cycling {} scenes every {:?}", scenes.len(), scene_duration);
    info!("Scene: {}", scenes[scene_index].name);

    while let Some(event) = events.recv() {
        match event {
            Event::Input { id, .. } => {
                if id.as_str() != "tick" {
                    continue;
                }

                if scene_started.elapsed() >= scene_duration {
                    scene_index = (scene_index + 1) % scenes.len();
                    scene_started = Instant::now();
                    info!("Scene: {}", scenes[scene_index].name);
                }

                let scene = &scenes[scene_index];
                let payload = serde_json::to_vec(&scene.hands)?;
                let arrow_data = BinaryArray::from_vec(vec![payload.as_slice()]);
                node.send_output(output_id.clone(), Default::default(), arrow_data)?;
                debug!("Sent {} hand(s) for '{}'", scene.hands.len(), scene.name);
            }
            Event::Stop(_) => {
                info!("test_hands node stopping");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
