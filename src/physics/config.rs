// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! World options. Could be built in code or loaded from RON files.

use crate::{
    core::algebra::Vector2,
    error::PhysicsError,
    physics::{contact::ContactListeners, projection::Projection},
};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path};

/// Construction options of a [`crate::physics::PhysicsWorld`]. Missing fields take their default
/// values when loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldOptions {
    /// Gravity in simulation units. Y axis points down, as in display space.
    pub gravity: Vector2<f32>,
    /// Whether resting bodies are allowed to sleep.
    pub allow_sleep: bool,
    pub listen_begin_contact: bool,
    pub listen_end_contact: bool,
    pub listen_pre_solve: bool,
    pub listen_post_solve: bool,
    /// Subtracted from display positions of every object.
    pub display_offset: Vector2<f32>,
    /// Perspective tilt. Zero means orthographic mapping.
    pub display_angle: f32,
    pub perspective_ratio: f32,
    /// Whether objects with negative depth scale are displayed in perspective mode.
    pub display_negative: bool,
    /// Simulation speed multiplier.
    pub speed: f32,
    /// Amount of ticks per second of simulated time when `delta` is `1.0`.
    pub reference_fps: f32,
    /// Solver iterations per step (`num_solver_iterations` of the engine).
    pub velocity_iterations: usize,
    /// Internal PGS iterations per solver iteration (`num_internal_pgs_iterations` of the
    /// engine).
    pub position_iterations: usize,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            gravity: Vector2::new(0.0, 9.8),
            allow_sleep: false,
            listen_begin_contact: false,
            listen_end_contact: false,
            listen_pre_solve: false,
            listen_post_solve: false,
            display_offset: Vector2::default(),
            display_angle: 0.0,
            perspective_ratio: 1.0,
            display_negative: false,
            speed: 1.0,
            reference_fps: 30.0,
            velocity_iterations: 10,
            position_iterations: 10,
        }
    }
}

impl WorldOptions {
    pub fn from_ron_str(str: &str) -> Result<Self, PhysicsError> {
        Ok(ron::de::from_str(str)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PhysicsError> {
        let file = File::open(path)?;
        Ok(ron::de::from_reader(file)?)
    }

    pub fn to_ron_string(&self) -> Result<String, PhysicsError> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PhysicsError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_ron_string()?.as_bytes())?;
        Ok(())
    }

    /// Contact notifications enabled by the `listen_*` flags.
    pub fn listeners(&self) -> ContactListeners {
        let mut listeners = ContactListeners::NONE;
        listeners.set(ContactListeners::BEGIN_CONTACT, self.listen_begin_contact);
        listeners.set(ContactListeners::END_CONTACT, self.listen_end_contact);
        listeners.set(ContactListeners::PRE_SOLVE, self.listen_pre_solve);
        listeners.set(ContactListeners::POST_SOLVE, self.listen_post_solve);
        listeners
    }

    pub fn projection(&self) -> Projection {
        Projection {
            offset: self.display_offset,
            display_angle: self.display_angle,
            perspective_ratio: self.perspective_ratio,
            display_negative: self.display_negative,
        }
    }

    /// Options with every contact notification enabled.
    pub fn listen_all(mut self) -> Self {
        self.listen_begin_contact = true;
        self.listen_end_contact = true;
        self.listen_pre_solve = true;
        self.listen_post_solve = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::WorldOptions;
    use crate::{error::PhysicsError, physics::contact::ContactListeners};

    #[test]
    fn missing_fields_take_defaults() {
        let options = WorldOptions::from_ron_str("(display_angle: 0.5, listen_begin_contact: true)")
            .unwrap();

        assert_eq!(options.display_angle, 0.5);
        assert_eq!(options.listeners(), ContactListeners::BEGIN_CONTACT);
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.reference_fps, 30.0);
        assert_eq!(options.gravity, WorldOptions::default().gravity);
        assert_eq!(options.velocity_iterations, 10);
        assert_eq!(options.position_iterations, 10);
    }

    #[test]
    fn options_survive_ron_round_trip() {
        let options = WorldOptions {
            speed: 2.5,
            display_negative: true,
            velocity_iterations: 4,
            ..WorldOptions::default().listen_all()
        };

        let text = options.to_ron_string().unwrap();
        assert_eq!(WorldOptions::from_ron_str(&text).unwrap(), options);
    }

    #[test]
    fn malformed_text_is_reported() {
        match WorldOptions::from_ron_str("(speed: \"fast\")") {
            Err(PhysicsError::Deserialize(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        match WorldOptions::load("this/file/does/not/exist.ron") {
            Err(PhysicsError::Io(_)) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
