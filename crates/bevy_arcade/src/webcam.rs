use bevy::prelude::{Assets, Commands, Handle, Image, ResMut, Resource};

/// Latest camera frame pushed by the tracker.
#[derive(Resource)]
pub struct WebcamImage {
    pub image: Handle<Image>,
    /// False until the first frame arrives.
    pub ready: bool,
}

/// The two pictures compared by the verification demo.
#[derive(Resource, Default)]
pub struct ReferenceImages {
    pub images: Option<[Handle<Image>; 2]>,
}

pub fn init_webcam(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    commands.insert_resource(WebcamImage {
        image: images.add(Image::default()),
        ready: false,
    });
}
