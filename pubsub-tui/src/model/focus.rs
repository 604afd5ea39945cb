//! Focus regions

/// The four interactive regions. The activity log never takes focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPanel {
    #[default]
    Topics,
    Subscriptions,
    Publisher,
    Subscriber,
}

impl FocusPanel {
    pub const ALL: [Self; 4] = [
        Self::Topics,
        Self::Subscriptions,
        Self::Publisher,
        Self::Subscriber,
    ];

    /// Next region, wrapping from Subscriber back to Topics.
    pub fn next(self) -> Self {
        match self {
            Self::Topics => Self::Subscriptions,
            Self::Subscriptions => Self::Publisher,
            Self::Publisher => Self::Subscriber,
            Self::Subscriber => Self::Topics,
        }
    }

    /// Previous region, wrapping from Topics to Subscriber.
    pub fn prev(self) -> Self {
        match self {
            Self::Topics => Self::Subscriber,
            Self::Subscriptions => Self::Topics,
            Self::Publisher => Self::Subscriptions,
            Self::Subscriber => Self::Publisher,
        }
    }

    /// `'1'..='4'` to a region.
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Topics),
            '2' => Some(Self::Subscriptions),
            '3' => Some(Self::Publisher),
            '4' => Some(Self::Subscriber),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Topics => 1,
            Self::Subscriptions => 2,
            Self::Publisher => 3,
            Self::Subscriber => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Topics => "Topics",
            Self::Subscriptions => "Subscriptions",
            Self::Publisher => "Publisher",
            Self::Subscriber => "Subscriber",
        }
    }
}
