//! Tile kinds and the pairing rules between them.
//!
//! The declaration order is the rank order: Void is 0 and Gold is 14.
//! Metals (Lead and above) may only be removed in ascending rank order.

use strum::{Display, VariantArray};

/// One of the fifteen tile kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, VariantArray)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Element {
    /// Placeholder for "no tile"; never stored on a board.
    Void,
    Fire,
    Earth,
    Water,
    Air,
    Salt,
    Life,
    Death,
    Mercury,
    Lead,
    Tin,
    Iron,
    Copper,
    Silver,
    Gold,
}

/// Number of element kinds tracked in per-kind sets (Fire through Mercury).
pub const NON_METAL_KINDS: usize = 8;

/// Number of metal kinds (Lead through Gold).
pub const METAL_KINDS: usize = 6;

/// The four cardinal elements, in move generation order.
pub const CARDINALS: [Element; 4] = [Element::Fire, Element::Earth, Element::Water, Element::Air];

impl Element {
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Element> {
        Element::VARIANTS.get(rank as usize).copied()
    }

    #[inline]
    pub const fn is_metal(self) -> bool {
        self.rank() >= Element::Lead.rank()
    }

    /// The metal unlocked after this one, or `None` for Gold and non-metals.
    pub fn next_metal(self) -> Option<Element> {
        if self.is_metal() {
            Element::from_rank(self.rank() + 1)
        } else {
            None
        }
    }

    /// Maps an input character to its element.
    pub const fn from_symbol(symbol: char) -> Option<Element> {
        let element = match symbol {
            'o' => Element::Void,
            'f' => Element::Fire,
            't' => Element::Earth,
            'e' => Element::Water,
            'a' => Element::Air,
            's' => Element::Salt,
            'v' => Element::Life,
            'm' => Element::Death,
            'h' => Element::Mercury,
            '1' => Element::Lead,
            '2' => Element::Tin,
            '3' => Element::Iron,
            '4' => Element::Copper,
            '5' => Element::Silver,
            '6' => Element::Gold,
            _ => return None,
        };
        Some(element)
    }

    /// The input character for this element.
    pub const fn symbol(self) -> char {
        match self {
            Element::Void => 'o',
            Element::Fire => 'f',
            Element::Earth => 't',
            Element::Water => 'e',
            Element::Air => 'a',
            Element::Salt => 's',
            Element::Life => 'v',
            Element::Death => 'm',
            Element::Mercury => 'h',
            Element::Lead => '1',
            Element::Tin => '2',
            Element::Iron => '3',
            Element::Copper => '4',
            Element::Silver => '5',
            Element::Gold => '6',
        }
    }
}

/// Returns true if two elements can be removed together.
///
/// Gold pairs with nothing here; its lone removal is a special move
/// produced by the board's move generator.
pub fn can_combine(first: Element, second: Element) -> bool {
    let (low, high) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };

    match low {
        Element::Fire | Element::Earth | Element::Water | Element::Air | Element::Salt => {
            low == high || high == Element::Salt
        }
        Element::Life => high == Element::Death,
        // low == Mercury means high is Mercury or a metal
        Element::Mercury => high < Element::Gold,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_declaration_order() {
        for (rank, &element) in Element::VARIANTS.iter().enumerate() {
            assert_eq!(element.rank() as usize, rank);
            assert_eq!(Element::from_rank(rank as u8), Some(element));
        }
        assert_eq!(Element::from_rank(15), None);
        assert_eq!(Element::Gold.rank(), 14);
    }

    #[test]
    fn test_metals_start_at_lead() {
        let metals: Vec<Element> = Element::VARIANTS
            .iter()
            .copied()
            .filter(|element| element.is_metal())
            .collect();
        assert_eq!(metals.len(), METAL_KINDS);
        assert_eq!(metals[0], Element::Lead);
        assert!(!Element::Mercury.is_metal());
    }

    #[test]
    fn test_next_metal_chain() {
        let mut chain = vec![Element::Lead];
        while let Some(next) = chain.last().and_then(|metal| metal.next_metal()) {
            chain.push(next);
        }
        assert_eq!(
            chain,
            vec![
                Element::Lead,
                Element::Tin,
                Element::Iron,
                Element::Copper,
                Element::Silver,
                Element::Gold
            ]
        );
        assert_eq!(Element::Salt.next_metal(), None);
    }

    #[test]
    fn test_symbol_roundtrip() {
        for &element in Element::VARIANTS {
            assert_eq!(Element::from_symbol(element.symbol()), Some(element));
        }
        assert_eq!(Element::from_symbol('x'), None);
        assert_eq!(Element::from_symbol('7'), None);
    }

    #[test]
    fn test_can_combine_is_symmetric() {
        for &first in Element::VARIANTS {
            for &second in Element::VARIANTS {
                assert_eq!(
                    can_combine(first, second),
                    can_combine(second, first),
                    "Asymmetric result for {first} and {second}"
                );
            }
        }
    }

    #[test]
    fn test_can_combine_rules() {
        assert!(can_combine(Element::Fire, Element::Fire));
        assert!(can_combine(Element::Air, Element::Salt));
        assert!(can_combine(Element::Salt, Element::Salt));
        assert!(!can_combine(Element::Fire, Element::Water));
        assert!(can_combine(Element::Death, Element::Life));
        assert!(!can_combine(Element::Life, Element::Life));
        assert!(!can_combine(Element::Salt, Element::Life));
        assert!(can_combine(Element::Mercury, Element::Lead));
        assert!(can_combine(Element::Silver, Element::Mercury));
        assert!(!can_combine(Element::Mercury, Element::Gold));
        assert!(!can_combine(Element::Gold, Element::Gold));
        assert!(!can_combine(Element::Lead, Element::Tin));
        assert!(!can_combine(Element::Void, Element::Void));
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Element::Mercury.to_string(), "mercury");
        assert_eq!(Element::Gold.to_string(), "gold");
    }
}
