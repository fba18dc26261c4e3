//! Techniques the classifier can select.

use std::fmt;

/// A recognized technique. Closed set; each has exactly one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Technique {
    /// Crossed index and middle finger, one hand.
    UnlimitedVoid,
    /// Open palm.
    MalevolentShrine,
    /// Thumbs touching with all fingers up, two hands.
    DivineDogs,
    /// Crossed fingers on both hands, wrists together.
    SelfEmbodiment,
}

impl Technique {
    /// Every technique, in registry order.
    pub const ALL: [Self; 4] = [
        Self::UnlimitedVoid,
        Self::MalevolentShrine,
        Self::DivineDogs,
        Self::SelfEmbodiment,
    ];

    /// HUD title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnlimitedVoid => "Unlimited Void",
            Self::MalevolentShrine => "Malevolent Shrine",
            Self::DivineDogs => "Divine Dogs",
            Self::SelfEmbodiment => "Self-Embodiment of Perfection",
        }
    }

    /// HUD subtitle.
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::UnlimitedVoid => "無量空処 - Domain Expansion",
            Self::MalevolentShrine => "伏魔御廚子 - Domain Expansion",
            Self::DivineDogs => "玉犬 - Ten Shadows Technique",
            Self::SelfEmbodiment => "無為転変 - Idle Transfiguration",
        }
    }

    /// Accent style class applied to the HUD.
    #[must_use]
    pub const fn accent(self) -> &'static str {
        match self {
            Self::UnlimitedVoid => "accent-gojo",
            Self::MalevolentShrine => "accent-sukuna",
            Self::DivineDogs => "accent-megumi",
            Self::SelfEmbodiment => "accent-mahito",
        }
    }

    /// Stable index into [`Technique::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether recognizing this technique needs two hands.
    #[must_use]
    pub const fn is_two_handed(self) -> bool {
        matches!(self, Self::DivineDogs | Self::SelfEmbodiment)
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
