//! Motion integration
//!
//! One call per tick; velocities are in units per tick so there is no dt.

use super::state::Body;

/// Add gravity to vertical velocity, then move by the velocity
pub fn integrate(body: &mut Body, gravity: f32) {
    body.prev_pos = body.pos;
    body.vel.y += gravity;
    body.pos += body.vel;
}

/// Set horizontal velocity from a move direction (-1, 0, +1)
pub fn steer(body: &mut Body, move_dir: i8, speed: f32) {
    body.vel.x = f32::from(move_dir.signum()) * speed;
}

/// Apply a jump impulse. Returns false if the body had to be grounded and was not.
pub fn jump(body: &mut Body, impulse: f32, requires_ground: bool) -> bool {
    if requires_ground && !body.grounded {
        return false;
    }
    body.vel.y = impulse;
    body.grounded = false;
    true
}
