//! Interaction domain: the interactable capability and its components.

use bevy::prelude::*;

use crate::movement::{CharacterController, FrameInput};

/// Something the player can interact with. The controller withdraws its own
/// control before `interact` is called; the interactable hands it back.
pub trait Interactable: Send + Sync + 'static {
    fn interact(&mut self, controller: &mut CharacterController);

    /// Advance a running interaction by one tick. Returns true once control
    /// has been returned and the interaction is over.
    fn update(&mut self, input: &FrameInput, controller: &mut CharacterController) -> bool;
}

/// Interactable attached to an entity on the interactable physics layer.
#[derive(Component)]
pub struct InteractionTarget(pub Box<dyn Interactable>);

impl InteractionTarget {
    pub fn new(interactable: impl Interactable) -> Self {
        Self(Box::new(interactable))
    }
}

/// Placed on a player while an interaction holds its control.
#[derive(Component, Debug)]
pub struct ActiveInteraction {
    pub target: Entity,
}

/// Signs and talking NPCs: one line per interact press.
#[derive(Debug, Clone, Default)]
pub struct Readable {
    lines: Vec<String>,
    cursor: usize,
    active: bool,
}

impl Readable {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            cursor: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lines shown so far in the current reading.
    pub fn lines_shown(&self) -> usize {
        self.cursor
    }

    fn show_next(&mut self) -> bool {
        match self.lines.get(self.cursor) {
            Some(line) => {
                info!("{}", line);
                self.cursor += 1;
                true
            }
            None => false,
        }
    }

    fn end(&mut self, controller: &mut CharacterController) {
        debug!("reading ended after {} lines", self.cursor);
        self.active = false;
        controller.return_control();
    }
}

impl Interactable for Readable {
    fn interact(&mut self, controller: &mut CharacterController) {
        if self.active {
            return;
        }
        self.active = true;
        self.cursor = 0;
        if !self.show_next() {
            self.end(controller);
        }
    }

    fn update(&mut self, input: &FrameInput, controller: &mut CharacterController) -> bool {
        if !self.active {
            return true;
        }
        if !input.interact_pressed || self.show_next() {
            return false;
        }
        self.end(controller);
        true
    }
}
