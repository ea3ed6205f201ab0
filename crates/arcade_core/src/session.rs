//! One running demo and its tick function.
//!
//! A [`Session`] owns every piece of state that survives between frames.
//! [`Session::tick`] consumes it together with whatever arrived since the
//! previous tick and returns the next state with the frame's draw calls, so
//! it can be driven by a real-time loop or by a test feeding canned frames.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use rand::Rng;
use tracing::info;

use arcade_api::{FaceDetection, HandLandmarks, Verification};

use crate::blocks::Playground;
use crate::config::{ArcadeConfig, CameraConfig};
use crate::error::ConfigError;
use crate::input::{
    FacePaddleMapper, HandContexts, HandGestureMapper, InputMapper, PaddleControl, PointerEvent,
};
use crate::overlay;
use crate::pong::{Pong, PongInput};
use crate::render::{Color, RenderCommand, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demo {
    Pong,
    Blocks,
    Faces,
    Emotions,
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    Face,
    Key,
    Hand,
    Mouse,
}

impl Demo {
    pub fn default_control(self) -> Option<ControlMode> {
        match self {
            Demo::Pong => Some(ControlMode::Face),
            Demo::Blocks => Some(ControlMode::Hand),
            Demo::Faces | Demo::Emotions | Demo::Verify => None,
        }
    }

    pub fn supports(self, mode: ControlMode) -> bool {
        matches!(
            (self, mode),
            (Demo::Pong, ControlMode::Face | ControlMode::Key)
                | (Demo::Blocks, ControlMode::Hand | ControlMode::Mouse)
        )
    }
}

impl FromStr for Demo {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pong" => Ok(Demo::Pong),
            "blocks" => Ok(Demo::Blocks),
            "faces" => Ok(Demo::Faces),
            "emotions" => Ok(Demo::Emotions),
            "verify" => Ok(Demo::Verify),
            other => Err(ConfigError::UnknownDemo(other.to_string())),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Demo::Pong => "pong",
            Demo::Blocks => "blocks",
            Demo::Faces => "faces",
            Demo::Emotions => "emotions",
            Demo::Verify => "verify",
        })
    }
}

impl FromStr for ControlMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "face" => Ok(ControlMode::Face),
            "key" => Ok(ControlMode::Key),
            "hand" => Ok(ControlMode::Hand),
            "mouse" => Ok(ControlMode::Mouse),
            other => Err(ConfigError::UnknownControlMode(other.to_string())),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControlMode::Face => "face",
            ControlMode::Key => "key",
            ControlMode::Hand => "hand",
            ControlMode::Mouse => "mouse",
        })
    }
}

/// Everything that arrived since the previous tick. `None` means the tracker
/// sent nothing new, which is not an error: the previous controls stay.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub faces: Option<Vec<FaceDetection>>,
    pub hands: Option<Vec<HandLandmarks>>,
    pub verification: Option<Verification>,
    /// Pixel sizes of the two verification images, once they are loaded.
    pub references: Option<[IVec2; 2]>,
    /// Keyboard directions for the top and bottom paddles.
    pub steer: Option<(i32, i32)>,
    /// Mouse events, already normalized to the playground.
    pub pointer: Vec<PointerEvent>,
    pub restart: bool,
}

#[derive(Debug, Clone)]
enum State {
    Pong {
        pong: Pong,
        mapper: FacePaddleMapper,
        paddles: PaddleControl,
        faces: Vec<FaceDetection>,
    },
    Blocks {
        playground: Playground,
        mapper: HandGestureMapper,
        contexts: HandContexts,
        hands: Vec<HandLandmarks>,
    },
    Overlay {
        faces: Vec<FaceDetection>,
    },
    Verify {
        verification: Option<Verification>,
        references: Option<[IVec2; 2]>,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    demo: Demo,
    control: Option<ControlMode>,
    camera: CameraConfig,
    state: State,
}

impl Session {
    pub fn new(
        demo: Demo,
        control: Option<ControlMode>,
        config: &ArcadeConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let control = match (control, demo.default_control()) {
            (Some(mode), _) if !demo.supports(mode) => {
                return Err(ConfigError::UnsupportedControl { demo, mode });
            }
            (Some(mode), _) => Some(mode),
            (None, default) => default,
        };

        let camera = config.camera.clone();
        let state = match demo {
            Demo::Pong => State::Pong {
                pong: Pong::new(&config.pong),
                mapper: FacePaddleMapper::new(camera.width, camera.height),
                paddles: PaddleControl::default(),
                faces: Vec::new(),
            },
            Demo::Blocks => State::Blocks {
                playground: Playground::new(&config.playground),
                mapper: HandGestureMapper::new(
                    camera.width,
                    camera.height,
                    config.hand.pinch_threshold,
                )
                .with_easing(config.hand.cursor_easing),
                contexts: HandContexts::default(),
                hands: Vec::new(),
            },
            Demo::Faces | Demo::Emotions => State::Overlay { faces: Vec::new() },
            Demo::Verify => State::Verify {
                verification: None,
                references: None,
            },
        };

        info!(%demo, control = ?control, "session created");
        Ok(Self {
            demo,
            control,
            camera,
            state,
        })
    }

    pub fn demo(&self) -> Demo {
        self.demo
    }

    pub fn control(&self) -> Option<ControlMode> {
        self.control
    }

    pub fn pong(&self) -> Option<&Pong> {
        match &self.state {
            State::Pong { pong, .. } => Some(pong),
            _ => None,
        }
    }

    pub fn playground(&self) -> Option<&Playground> {
        match &self.state {
            State::Blocks { playground, .. } => Some(playground),
            _ => None,
        }
    }

    /// Pixel size of each surface this session draws on.
    pub fn surface_size(&self, surface: Surface) -> Option<IVec2> {
        let camera = IVec2::new(self.camera.width, self.camera.height);
        match (&self.state, surface) {
            (State::Pong { pong, .. }, Surface::Game) => Some(pong.screen),
            (State::Blocks { playground, .. }, Surface::Game) => Some(playground.size),
            (State::Pong { .. } | State::Blocks { .. }, Surface::Camera) => {
                self.uses_camera().then_some(camera)
            }
            (State::Overlay { .. }, Surface::Camera) => Some(camera),
            (State::Verify { .. }, Surface::Camera) => {
                Some(IVec2::new(overlay::VERIFICATION_CROP * 2, overlay::VERIFICATION_CROP))
            }
            (State::Overlay { .. } | State::Verify { .. }, Surface::Game) => None,
        }
    }

    /// Whether the session is steered by the tracker rather than a keyboard
    /// or mouse.
    pub fn uses_camera(&self) -> bool {
        !matches!(self.control, Some(ControlMode::Key | ControlMode::Mouse))
    }

    pub fn tick<R: Rng + ?Sized>(
        mut self,
        input: FrameInput,
        rng: &mut R,
    ) -> (Self, Vec<RenderCommand>) {
        let uses_camera = self.uses_camera();
        let camera_frame = overlay::camera_frame(self.camera.width, self.camera.height);
        let mut commands = Vec::new();

        self.state = match self.state {
            State::Pong { mut pong, mapper, mut paddles, mut faces } => {
                if input.restart {
                    pong.restart(rng);
                }
                let steer = if uses_camera {
                    if let Some(new_faces) = input.faces {
                        faces = new_faces;
                        mapper.map(&mut paddles, &faces);
                    }
                    PongInput::Place(paddles)
                } else {
                    input
                        .steer
                        .map(|(top, bottom)| PongInput::Steer { top, bottom })
                        .unwrap_or_default()
                };

                let (pong, game) = pong.tick(&steer, rng);
                commands.extend(game);
                if uses_camera {
                    let players = mapper.players(&faces);
                    commands.push(camera_frame);
                    commands.extend(overlay::roi_overlay(
                        mapper.left_region(),
                        mapper.right_region(),
                        &players,
                        self.camera.left_color,
                        self.camera.right_color,
                    ));
                }
                State::Pong { pong, mapper, paddles, faces }
            }
            State::Blocks { playground, mapper, mut contexts, mut hands } => {
                let events = if uses_camera {
                    match input.hands {
                        Some(new_hands) => {
                            hands = new_hands;
                            mapper.map(&mut contexts, &hands)
                        }
                        None => Vec::new(),
                    }
                } else {
                    input.pointer
                };

                let (playground, game) = playground.tick(&events, rng);
                commands.extend(game);
                if uses_camera {
                    commands.push(camera_frame);
                    commands.extend(overlay::hand_overlay(&mapper, &hands));
                }
                State::Blocks { playground, mapper, contexts, hands }
            }
            State::Overlay { mut faces } => {
                if let Some(new_faces) = input.faces {
                    faces = new_faces;
                }
                commands.push(camera_frame);
                if self.demo == Demo::Emotions {
                    commands.extend(overlay::emotion_overlay(&faces));
                } else {
                    commands.extend(overlay::detection_overlay(&faces));
                }
                State::Overlay { faces }
            }
            State::Verify { mut verification, mut references } => {
                verification = input.verification.or(verification);
                references = input.references.or(references);
                match (&verification, references) {
                    (Some(result), Some(sizes)) => {
                        commands.extend(overlay::verification_overlay(result, sizes))
                    }
                    _ => {
                        commands.push(RenderCommand::Clear {
                            surface: Surface::Camera,
                            color: Color::BLACK,
                        });
                        commands.push(RenderCommand::Text {
                            surface: Surface::Camera,
                            position: IVec2::new(20, 20),
                            text: "Waiting for verification".to_string(),
                            color: Color::WHITE,
                            size: overlay::LABEL_SIZE,
                        });
                    }
                }
                State::Verify { verification, references }
            }
        };

        (self, commands)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use arcade_api::Rect;

    use crate::input::Pointer;

    use super::*;

    fn face(x: i32) -> FaceDetection {
        FaceDetection {
            facial_area: Rect::new(x, 100, 100, 100),
            confidence: 0.9,
            dominant_emotion: Some("neutral".to_string()),
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("pong".parse::<Demo>(), Ok(Demo::Pong));
        assert_eq!("mouse".parse::<ControlMode>(), Ok(ControlMode::Mouse));
        assert_eq!(
            "joystick".parse::<ControlMode>(),
            Err(ConfigError::UnknownControlMode("joystick".to_string()))
        );
        assert_eq!("tetris".parse::<Demo>(), Err(ConfigError::UnknownDemo("tetris".to_string())));
    }

    #[test]
    fn rejects_mismatched_control() {
        let config = ArcadeConfig::default();
        let err = Session::new(Demo::Pong, Some(ControlMode::Hand), &config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedControl {
                demo: Demo::Pong,
                mode: ControlMode::Hand
            }
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ArcadeConfig {
            tick_rate: -1.0,
            ..Default::default()
        };
        assert!(Session::new(Demo::Faces, None, &config).is_err());
    }

    #[test]
    fn face_pong_follows_faces_and_keeps_them_between_frames() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::new(Demo::Pong, None, &ArcadeConfig::default()).unwrap();
        assert_eq!(session.control(), Some(ControlMode::Face));

        let input = FrameInput {
            faces: Some(vec![face(110), face(1010)]),
            ..Default::default()
        };
        let (session, commands) = session.tick(input, &mut rng);
        let pong = session.pong().unwrap();
        // (110 + 50) / 640 of a 600 px court.
        assert_eq!(pong.top.rect.x, 150);
        assert_eq!(pong.bottom.rect.x, 393);
        assert!(commands.iter().any(|c| c.surface() == Surface::Camera));

        let (session, _) = session.tick(FrameInput::default(), &mut rng);
        assert_eq!(session.pong().unwrap().top.rect.x, 150);
    }

    #[test]
    fn key_pong_has_no_camera() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = ArcadeConfig::default();
        let session = Session::new(Demo::Pong, Some(ControlMode::Key), &config).unwrap();
        assert_eq!(session.surface_size(Surface::Camera), None);
        let input = FrameInput {
            steer: Some((-1, 1)),
            ..Default::default()
        };
        let (session, commands) = session.tick(input, &mut rng);
        let pong = session.pong().unwrap();
        assert_eq!(pong.top.rect.x, 245);
        assert_eq!(pong.bottom.rect.x, 255);
        assert!(commands.iter().all(|c| c.surface() == Surface::Game));
    }

    #[test]
    fn hand_blocks_create_on_pinch() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::new(Demo::Blocks, None, &ArcadeConfig::default()).unwrap();
        let mut points = vec![Vec2::new(0.25, 0.5); 21];
        points[4] = Vec2::new(0.9, 0.9);
        points[8] = Vec2::new(0.9, 0.91);
        let input = FrameInput {
            hands: Some(vec![HandLandmarks { id: None, points }]),
            ..Default::default()
        };
        let (session, _) = session.tick(input, &mut rng);
        let playground = session.playground().unwrap();
        let block = playground.blocks.iter().next().unwrap();
        assert_eq!((block.rect.x, block.rect.y), (320, 360));
    }

    fn hands(at: Vec2, pinch: bool) -> FrameInput {
        let mut points = vec![at; 21];
        points[4] = Vec2::new(0.9, 0.9);
        points[8] = if pinch { Vec2::new(0.9, 0.91) } else { Vec2::new(0.1, 0.1) };
        FrameInput {
            hands: Some(vec![HandLandmarks { id: None, points }]),
            ..Default::default()
        }
    }

    #[test]
    fn hand_lost_while_dragging_lets_go() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::new(Demo::Blocks, None, &ArcadeConfig::default()).unwrap();
        let start = Vec2::new(0.25, 0.5);

        let (session, _) = session.tick(hands(start, true), &mut rng);
        let (session, _) = session.tick(hands(start, false), &mut rng);
        let (session, _) = session.tick(hands(start, true), &mut rng);
        assert!(session.playground().unwrap().blocks.dragging().is_some());

        let lost = FrameInput {
            hands: Some(Vec::new()),
            ..Default::default()
        };
        let (session, _) = session.tick(lost, &mut rng);
        let (session, _) = session.tick(hands(Vec2::new(0.5, 0.5), false), &mut rng);

        let playground = session.playground().unwrap();
        assert_eq!(playground.blocks.dragging(), None);
        assert_eq!(playground.blocks.len(), 1);
        let block = playground.blocks.iter().next().unwrap();
        assert_eq!((block.rect.x, block.rect.y), (320, 360));
        assert_eq!(playground.cursor, IVec2::new(640, 360));
    }

    #[test]
    fn mouse_blocks_use_pointer_events() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = ArcadeConfig::default();
        let session = Session::new(Demo::Blocks, Some(ControlMode::Mouse), &config).unwrap();
        let input = FrameInput {
            pointer: vec![PointerEvent::Press(Pointer::new(0.5, 0.5, true))],
            ..Default::default()
        };
        let (session, _) = session.tick(input, &mut rng);
        assert_eq!(session.playground().unwrap().blocks.len(), 1);
    }

    #[test]
    fn emotions_overlay_keeps_last_faces() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::new(Demo::Emotions, None, &ArcadeConfig::default()).unwrap();
        let input = FrameInput {
            faces: Some(vec![face(0)]),
            ..Default::default()
        };
        let (session, _) = session.tick(input, &mut rng);
        let (_, commands) = session.tick(FrameInput::default(), &mut rng);
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[2], RenderCommand::Text { text, .. } if text == "neutral"));
    }

    #[test]
    fn verification_waits_for_both_inputs() {
        let mut rng = StdRng::seed_from_u64(2);
        let session = Session::new(Demo::Verify, None, &ArcadeConfig::default()).unwrap();
        let input = FrameInput {
            verification: Some(Verification {
                verified: true,
                img1: Rect::new(0, 0, 10, 10),
                img2: Rect::new(0, 0, 10, 10),
            }),
            ..Default::default()
        };
        let (session, commands) = session.tick(input, &mut rng);
        assert_eq!(commands.len(), 2);

        let input = FrameInput {
            references: Some([IVec2::new(100, 100), IVec2::new(100, 100)]),
            ..Default::default()
        };
        let (_, commands) = session.tick(input, &mut rng);
        assert_eq!(commands.len(), 6);
    }
}
