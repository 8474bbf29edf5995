use framecore_common::{EntityId, Transform, VelocityParams};
use framecore_input::{InputState, symbols};
use framecore_kernel::{EntityRegistry, KernelError};
use serde::{Deserialize, Serialize};

/// Tuning shared by every input-driven entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Forward speed multiplier while any boost trigger is active.
    pub boost_multiplier: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            boost_multiplier: 2.0,
        }
    }
}

/// Turns held input symbols into transform changes for the controlled entity.
///
/// Never fails: symbols that were never written read as not held, and a zero
/// delta leaves the transform untouched.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    config: MovementConfig,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Advance one transform by one frame.
    ///
    /// Translation runs along the facing held at the start of the step, then
    /// yaw is turned. Only forward motion is boosted.
    pub fn step(
        &self,
        transform: &mut Transform,
        velocity: &VelocityParams,
        input: &InputState,
        dt: f64,
        boosted: bool,
    ) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let mut drive = 0.0;
        if input.is_held(symbols::FORWARD) {
            drive += if boosted {
                self.config.boost_multiplier
            } else {
                1.0
            };
        }
        if input.is_held(symbols::BACKWARD) {
            drive -= 1.0;
        }
        if drive != 0.0 {
            let displacement = transform.forward() * (dt * velocity.linear_speed * drive);
            if displacement.is_finite() {
                transform.position += displacement;
            }
        }

        let mut turn = 0.0;
        if input.is_held(symbols::TURN_LEFT) {
            turn += 1.0;
        }
        if input.is_held(symbols::TURN_RIGHT) {
            turn -= 1.0;
        }
        if turn != 0.0 {
            transform
                .orientation
                .add_yaw(velocity.turn_speed * dt * turn);
        }
    }

    /// Step a registry entity in place.
    pub fn step_entity(
        &self,
        registry: &mut EntityRegistry,
        id: EntityId,
        input: &InputState,
        dt: f64,
        boosted: bool,
    ) -> Result<(), KernelError> {
        let record = registry.get(id).ok_or(KernelError::UnknownEntity(id))?;
        if !record.kind.is_dynamic() {
            return Err(KernelError::ImmutableEntity {
                id,
                kind: record.kind,
            });
        }
        let velocity = record
            .velocity
            .ok_or(KernelError::MissingVelocity(record.kind))?;
        let transform = registry.transform_mut(id)?;
        self.step(transform, &velocity, input, dt, boosted);
        Ok(())
    }
}
