//! Sample types for paired servo sensor records

/// One channel value with the timestamp it was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimedReading {
    /// Capture time in seconds from stream start.
    pub time: f32,
    /// Sensor value in encoder ticks.
    pub value: i32,
}

/// One paired servo record: a shared timestamp, the encoder reading,
/// and the potentiometer reading.
///
/// The same type carries both raw parsed records (pot in pot ticks)
/// and filtered pairs (pot scaled to encoder ticks); the pipeline
/// documents which is which at each point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoSample {
    /// Capture time in seconds from stream start.
    pub time: f32,
    /// Encoder channel value.
    pub encoder: i32,
    /// Potentiometer channel value.
    pub pot: i32,
}

impl ServoSample {
    /// Create a sample from its three fields.
    pub const fn new(time: f32, encoder: i32, pot: i32) -> Self {
        Self { time, encoder, pot }
    }

    /// The encoder channel as a timestamped reading.
    pub const fn encoder_reading(&self) -> TimedReading {
        TimedReading {
            time: self.time,
            value: self.encoder,
        }
    }

    /// The potentiometer channel as a timestamped reading.
    pub const fn pot_reading(&self) -> TimedReading {
        TimedReading {
            time: self.time,
            value: self.pot,
        }
    }
}
