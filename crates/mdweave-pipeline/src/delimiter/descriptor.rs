use crate::error::PipelineError;

/// Rules for one delimiter character.
///
/// A span consumes between `min_width` and `max_width` characters from each
/// side. Descriptors with `min_width < max_width` are two-level (e.g. `*` for
/// emphasis and strong emphasis); descriptors with `min_width == max_width`
/// only ever produce one span width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimiterDescriptor {
    pub character: char,
    pub min_width: usize,
    pub max_width: usize,
    /// Whether a run may open or close inside a word. When `false` the
    /// stricter underscore flanking rules apply.
    pub within_word: bool,
}

impl DelimiterDescriptor {
    /// Create a validated descriptor.
    pub fn new(
        character: char,
        min_width: usize,
        max_width: usize,
        within_word: bool,
    ) -> Result<Self, PipelineError> {
        let descriptor = Self {
            character,
            min_width,
            max_width,
            within_word,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check the descriptor invariants.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let reason = if self.min_width == 0 {
            "minimum width must be at least 1"
        } else if self.min_width > self.max_width {
            "minimum width exceeds maximum width"
        } else if self.character.is_whitespace() || self.character.is_alphanumeric() {
            "delimiter must be a punctuation or symbol character"
        } else {
            return Ok(());
        };
        Err(PipelineError::InvalidDescriptor {
            character: self.character,
            reason,
        })
    }

    /// Whether spans of two different widths can be produced.
    #[must_use]
    pub fn is_two_level(&self) -> bool {
        self.min_width < self.max_width
    }
}

/// The descriptors governed by one delimiter parser, at most one per character.
#[derive(Clone, Debug, Default)]
pub struct DescriptorSet {
    descriptors: Vec<DelimiterDescriptor>,
    characters: Vec<char>,
}

impl DescriptorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Fails if the descriptor is invalid or its character is already governed.
    pub fn add(&mut self, descriptor: DelimiterDescriptor) -> Result<(), PipelineError> {
        descriptor.validate()?;
        if self.contains(descriptor.character) {
            return Err(PipelineError::DuplicateDescriptor(descriptor.character));
        }
        self.characters.push(descriptor.character);
        self.descriptors.push(descriptor);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, character: char) -> bool {
        self.characters.contains(&character)
    }

    #[must_use]
    pub fn get(&self, character: char) -> Option<&DelimiterDescriptor> {
        self.descriptors.iter().find(|d| d.character == character)
    }

    /// Governed characters in registration order.
    #[must_use]
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    pub fn iter(&self) -> impl Iterator<Item = &DelimiterDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_widths() {
        assert!(DelimiterDescriptor::new('*', 1, 2, true).is_ok());
        assert!(DelimiterDescriptor::new('"', 2, 2, false).is_ok());
        assert!(matches!(
            DelimiterDescriptor::new('*', 0, 2, true),
            Err(PipelineError::InvalidDescriptor { character: '*', .. })
        ));
        assert!(matches!(
            DelimiterDescriptor::new('*', 3, 2, true),
            Err(PipelineError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_validate_character() {
        assert!(DelimiterDescriptor::new('a', 1, 1, true).is_err());
        assert!(DelimiterDescriptor::new(' ', 1, 1, true).is_err());
        assert!(DelimiterDescriptor::new('~', 1, 1, true).is_ok());
    }

    #[test]
    fn test_duplicate_character_rejected() {
        let mut set = DescriptorSet::new();
        set.add(DelimiterDescriptor::new('*', 1, 2, true).unwrap()).unwrap();

        let err = set
            .add(DelimiterDescriptor::new('*', 2, 2, false).unwrap())
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateDescriptor('*')));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get('*').unwrap().max_width, 2);
    }

    #[test]
    fn test_add_validates_hand_built_descriptor() {
        let mut set = DescriptorSet::new();
        let invalid = DelimiterDescriptor {
            character: '^',
            min_width: 2,
            max_width: 1,
            within_word: true,
        };
        assert!(set.add(invalid).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_characters_in_registration_order() {
        let mut set = DescriptorSet::new();
        set.add(DelimiterDescriptor::new('_', 1, 2, false).unwrap()).unwrap();
        set.add(DelimiterDescriptor::new('*', 1, 2, true).unwrap()).unwrap();
        assert_eq!(set.characters(), &['_', '*']);
    }
}
