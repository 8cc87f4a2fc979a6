use glam::Vec2;

/// Pickups blink for this long before vanishing
pub const EXPIRY_WARNING_SECS: f32 = 3.0;

pub const PICKUP_RADIUS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Health,
    Ammo,
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub position: Vec2,
    pub kind: PickupKind,
    pub age: f32,
    pub lifetime: f32,
}

impl Pickup {
    pub fn new(position: Vec2, kind: PickupKind, lifetime: f32) -> Self {
        Self {
            position,
            kind,
            age: 0.0,
            lifetime,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Blinks at 4 Hz once the pickup is about to disappear
    pub fn is_visible(&self) -> bool {
        let remaining = self.lifetime - self.age;
        if remaining > EXPIRY_WARNING_SECS {
            return true;
        }
        ((remaining * 8.0) as u32).is_multiple_of(2)
    }

    pub fn radius(&self) -> f32 {
        PICKUP_RADIUS
    }

    pub fn get_char(&self) -> char {
        match self.kind {
            PickupKind::Health => '♥',
            PickupKind::Ammo => '≡',
        }
    }
}
