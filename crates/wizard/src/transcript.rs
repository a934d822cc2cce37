//! challenge sampling for randomized checks
//!
//! Checks that need a random point (the inclusion fingerprint) draw it from
//! a [`ChallengeSource`]. `Entropy` samples the OS rng on every draw.
//! `Transcript` derives the point from a SHA256 fiat-shamir transcript
//! seeded by the outer proof transcript and bound to the query's canonical
//! name, so a verifier replaying the same transcript gets the same point and
//! a prover cannot pick it.

use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::F;

const DOMAIN: &[u8] = b"wizard-query-challenge-v1";

/// SHA256 fiat-shamir transcript, squeezed through chacha20
#[derive(Clone)]
pub struct Sha256Transcript {
    hasher: Sha256,
    counter: u32,
}

impl Sha256Transcript {
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN);
        hasher.update(seed);

        Self { hasher, counter: 0 }
    }

    /// absorb a length-prefixed labelled message
    pub fn absorb(&mut self, label: &[u8], message: &[u8]) {
        self.hasher.update((label.len() as u32).to_le_bytes());
        self.hasher.update(label);
        self.hasher.update((message.len() as u64).to_le_bytes());
        self.hasher.update(message);
    }

    fn squeeze_rng(&mut self) -> ChaCha20Rng {
        self.hasher.update(self.counter.to_le_bytes());
        self.counter += 1;

        let digest = self.hasher.clone().finalize();
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest[..32]);
        ChaCha20Rng::from_seed(seed)
    }

    /// squeeze a uniformly distributed challenge
    pub fn challenge<E>(&mut self) -> E
    where
        rand::distributions::Standard: rand::distributions::Distribution<E>,
    {
        self.squeeze_rng().gen()
    }
}

/// where randomized checks get their challenges from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChallengeSource {
    /// fresh OS entropy on every draw
    #[default]
    Entropy,
    /// derived from the outer proof transcript state
    Transcript { seed: [u8; 32] },
}

impl ChallengeSource {
    /// draw a challenge for the check labelled `label`
    ///
    /// panics if the OS entropy source fails: no check can proceed soundly
    /// without its challenge
    pub fn draw(&self, label: &str) -> F {
        match self {
            ChallengeSource::Entropy => {
                let mut bytes = [0u8; 16];
                if let Err(err) = OsRng.try_fill_bytes(&mut bytes) {
                    panic!("entropy source exhausted while sampling a challenge: {err}");
                }
                F::from_value(u128::from_le_bytes(bytes))
            }
            ChallengeSource::Transcript { seed } => {
                let mut transcript = Sha256Transcript::new(seed);
                transcript.absorb(b"query", label.as_bytes());
                transcript.challenge()
            }
        }
    }

    pub fn is_transcript_bound(&self) -> bool {
        matches!(self, ChallengeSource::Transcript { .. })
    }
}
