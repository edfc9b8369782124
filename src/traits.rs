use serde::{Deserialize, Serialize};

/// An entrant (team or player) that can be seeded.
pub trait Entrant {
    /// Unique identifier of the entrant.
    ///
    /// Identifiers are expected to be unique inside a single call; they are never deduplicated.
    fn id(&self) -> &str;

    /// Prior ranking of the entrant, where 1 is the strongest. [`None`] if the entrant is unseeded.
    fn seed(&self) -> Option<u32>;

    /// Called when the entrant receives a new seed (its draw order).
    fn assign_seed(&mut self, seed: u32);
}

/// Display attributes of a [`TeamEntry`]. Never inspected while seeding.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub struct DisplayData {
    pub name: Option<String>,
    pub logo: Option<String>,
}

impl DisplayData {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        DisplayData {
            name: Some(name.into()),
            logo: None,
        }
    }

    #[inline]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// A ready-made [`Entrant`] carrying an opaque payload.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TeamEntry<P = DisplayData> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default)]
    pub payload: P,
}

impl<P: Default> TeamEntry<P> {
    /// Creates an unseeded entry with a default payload.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        TeamEntry {
            id: id.into(),
            seed: None,
            payload: P::default(),
        }
    }

    /// Creates an entry with the provided seed and a default payload.
    #[inline]
    pub fn seeded(id: impl Into<String>, seed: u32) -> Self {
        TeamEntry {
            id: id.into(),
            seed: Some(seed),
            payload: P::default(),
        }
    }
}

impl<P> TeamEntry<P> {
    #[inline]
    pub fn with_payload(id: impl Into<String>, seed: Option<u32>, payload: P) -> Self {
        TeamEntry {
            id: id.into(),
            seed,
            payload,
        }
    }
}

impl<P> Entrant for TeamEntry<P> {
    #[inline]
    fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    fn seed(&self) -> Option<u32> {
        self.seed
    }

    #[inline]
    fn assign_seed(&mut self, seed: u32) {
        self.seed = Some(seed);
    }
}

// TRAIT DEFAULT IMPLEMENTATIONS

impl<E: Entrant + ?Sized> Entrant for &mut E {
    #[inline]
    fn id(&self) -> &str {
        (**self).id()
    }

    #[inline]
    fn seed(&self) -> Option<u32> {
        (**self).seed()
    }

    #[inline]
    fn assign_seed(&mut self, seed: u32) {
        (**self).assign_seed(seed);
    }
}
