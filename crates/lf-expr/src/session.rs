//! Hidden-function catalog and the per-player guessing session.

use crate::ast::Expr;
use crate::error::{ExprError, ExprResult};
use crate::parse::parse;
use crate::score::{GuessOutcome, default_grid, evaluate_guess};
use lf_core::Real;
use rand::Rng;
use tracing::{debug, info};

/// Hidden functions shipped with the game.
const BUILTIN_TARGETS: &[&str] = &[
    "x^2 - 3",
    "2*x + 1",
    "sin(x)",
    "x^3 / 10",
    "abs(x) - 2",
    "exp(x/5)",
    "3*cos(x)",
    "sqrt(abs(x))",
];

/// A hidden function together with the text it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub source: String,
    pub expr: Expr,
}

impl Target {
    pub fn parse(source: &str) -> ExprResult<Self> {
        Ok(Self {
            source: source.trim().to_string(),
            expr: parse(source)?,
        })
    }
}

/// Non-empty list of targets to draw from.
#[derive(Clone, Debug)]
pub struct TargetCatalog {
    targets: Vec<Target>,
}

impl TargetCatalog {
    /// Parse every source. Fails on the first invalid one or an empty list.
    pub fn new<S: AsRef<str>>(sources: &[S]) -> ExprResult<Self> {
        if sources.is_empty() {
            return Err(ExprError::InvalidArg {
                what: "target catalog must not be empty",
            });
        }
        let targets = sources
            .iter()
            .map(|s| Target::parse(s.as_ref()))
            .collect::<ExprResult<Vec<_>>>()?;
        Ok(Self { targets })
    }

    pub fn builtin() -> ExprResult<Self> {
        Self::new(BUILTIN_TARGETS)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Target {
        &self.targets[rng.gen_range(0..self.targets.len())]
    }
}

/// One player's game state.
///
/// Holds the current hidden function until [`reset`](Self::reset) is called.
/// Owned by the caller; there is no process-wide session.
#[derive(Clone, Debug)]
pub struct GuessSession {
    catalog: TargetCatalog,
    xs: Vec<Real>,
    current: Option<Target>,
    attempts: usize,
}

impl GuessSession {
    /// Session over `catalog`, compared on the default grid.
    pub fn new(catalog: TargetCatalog) -> Self {
        Self::with_grid(catalog, default_grid())
    }

    /// Session compared on a caller-chosen grid.
    pub fn with_grid(catalog: TargetCatalog, xs: Vec<Real>) -> Self {
        Self {
            catalog,
            xs,
            current: None,
            attempts: 0,
        }
    }

    /// Session with a fixed target already chosen.
    pub fn with_target(catalog: TargetCatalog, target: Target) -> Self {
        let mut session = Self::new(catalog);
        session.current = Some(target);
        session
    }

    /// The held target, drawing one from the catalog on first use.
    pub fn current_or_init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Target {
        let catalog = &self.catalog;
        let attempts = &mut self.attempts;
        self.current.get_or_insert_with(|| {
            let picked = catalog.pick(rng).clone();
            debug!(target_fn = %picked.source, "picked hidden function");
            *attempts = 0;
            picked
        })
    }

    pub fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Forget the held target; the next call draws a new one.
    pub fn reset(&mut self) {
        self.current = None;
        self.attempts = 0;
    }

    /// Guesses scored against the current target.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn grid(&self) -> &[Real] {
        &self.xs
    }

    /// Parse and grade `input` against the held target.
    pub fn guess<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> ExprResult<GuessOutcome> {
        let target = self.current_or_init(rng).expr.clone();
        let outcome = evaluate_guess(&target, input, &self.xs)?;
        self.attempts += 1;
        info!(
            score = outcome.score,
            verdict = ?outcome.verdict,
            attempts = self.attempts,
            "guess scored"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Verdict;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn builtin_targets_all_parse() {
        let catalog = TargetCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), BUILTIN_TARGETS.len());
        assert_eq!(catalog.get(0).unwrap().source, "x^2 - 3");
        for t in catalog.iter() {
            assert!(t.expr.try_eval_grid(&default_grid()).is_ok(), "{}", t.source);
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TargetCatalog::new(&empty),
            Err(ExprError::InvalidArg { .. })
        ));
        assert!(TargetCatalog::new(&["x +"]).is_err());
    }

    #[test]
    fn target_is_stable_until_reset() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = GuessSession::new(TargetCatalog::builtin().unwrap());
        assert!(session.current().is_none());

        let first = session.current_or_init(&mut rng).clone();
        for _ in 0..10 {
            assert_eq!(session.current_or_init(&mut rng), &first);
        }

        session.reset();
        assert!(session.current().is_none());
        session.current_or_init(&mut rng);
        assert!(session.current().is_some());
    }

    #[test]
    fn single_entry_catalog_always_picks_it() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = GuessSession::new(TargetCatalog::new(&["2*x"]).unwrap());
        for _ in 0..5 {
            session.reset();
            assert_eq!(session.current_or_init(&mut rng).source, "2*x");
        }
    }

    #[test]
    fn guess_against_fixed_target() {
        let mut rng = StdRng::seed_from_u64(0);
        let catalog = TargetCatalog::builtin().unwrap();
        let target = Target::parse("x^2 - 3").unwrap();
        let mut session = GuessSession::with_target(catalog, target);

        let found = session.guess("x**2 - 3", &mut rng).unwrap();
        assert_eq!(found.verdict, Verdict::Found);
        let far = session.guess("x", &mut rng).unwrap();
        assert_eq!(far.verdict, Verdict::Far);
        assert_eq!(session.attempts(), 2);
        assert_eq!(session.current().unwrap().source, "x^2 - 3");
    }

    #[test]
    fn failed_guess_does_not_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = GuessSession::new(TargetCatalog::builtin().unwrap());
        assert!(session.guess("ln(", &mut rng).is_err());
        assert_eq!(session.attempts(), 0);
        // The target was still drawn.
        assert!(session.current().is_some());
    }
}
