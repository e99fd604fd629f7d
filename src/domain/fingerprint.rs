/// Location of a fingerprint sensor on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FingerprintLocation {
    /// The location is not known.
    LocationUnknown,
    /// Top left of the power button.
    PowerButtonTopLeft,
    /// Bottom left of the keyboard.
    KeyboardBottomLeft,
    /// Bottom right of the keyboard.
    KeyboardBottomRight,
    /// Top right of the keyboard.
    KeyboardTopRight,
    /// The device has no fingerprint sensor.
    NotPresent,
    /// Right side of the device.
    RightSide,
    /// Left side of the device.
    LeftSide,
    /// Present, location unspecified.
    Present,
}

impl FingerprintLocation {
    /// Every location, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::LocationUnknown,
        Self::PowerButtonTopLeft,
        Self::KeyboardBottomLeft,
        Self::KeyboardBottomRight,
        Self::KeyboardTopRight,
        Self::NotPresent,
        Self::RightSide,
        Self::LeftSide,
        Self::Present,
    ];

    /// The name of the location as used in DUT attribute values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocationUnknown => "LOCATION_UNKNOWN",
            Self::PowerButtonTopLeft => "POWER_BUTTON_TOP_LEFT",
            Self::KeyboardBottomLeft => "KEYBOARD_BOTTOM_LEFT",
            Self::KeyboardBottomRight => "KEYBOARD_BOTTOM_RIGHT",
            Self::KeyboardTopRight => "KEYBOARD_TOP_RIGHT",
            Self::NotPresent => "NOT_PRESENT",
            Self::RightSide => "RIGHT_SIDE",
            Self::LeftSide => "LEFT_SIDE",
            Self::Present => "PRESENT",
        }
    }

    /// Whether this location means a sensor is physically present.
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::LocationUnknown | Self::NotPresent)
    }

    /// Every location that implies a sensor is present.
    pub fn present() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|location| location.is_present())
    }
}
