use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, VariantNames};

/// Concentrated-liquidity fee tiers, in hundredths of a basis point.
pub const CONCENTRATED_FEE_TIERS: [u32; 3] = [500, 3_000, 10_000];

/// Exchange venues the engine can route through, in search order.
#[derive(
    Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, EnumIter, VariantNames, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Venue {
    UniswapV2,
    Sushiswap,
    UniswapV3,
    Balancer,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueKind {
    ConstantProduct,
    ConcentratedLiquidity,
    Weighted,
}

impl Venue {
    pub fn kind(&self) -> VenueKind {
        match self {
            Venue::UniswapV2 | Venue::Sushiswap => VenueKind::ConstantProduct,
            Venue::UniswapV3 => VenueKind::ConcentratedLiquidity,
            Venue::Balancer => VenueKind::Weighted,
        }
    }

    /// Dashboard identifier of the venue.
    pub fn dex_id(&self) -> u8 {
        match self {
            Venue::UniswapV2 => 0,
            Venue::Sushiswap => 1,
            Venue::UniswapV3 => 2,
            Venue::Balancer => 3,
        }
    }

    pub fn fee_tiers(&self) -> Vec<Option<u32>> {
        match self.kind() {
            VenueKind::ConcentratedLiquidity => CONCENTRATED_FEE_TIERS.iter().copied().map(Some).collect(),
            _ => vec![None],
        }
    }
}

/// One leg's choice of venue. `fee_tier` is only set for fee-tiered venues.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VenueSelection {
    pub venue: Venue,
    #[serde(default)]
    pub fee_tier: Option<u32>,
}

impl VenueSelection {
    pub fn new(venue: Venue, fee_tier: Option<u32>) -> Self {
        Self { venue, fee_tier }
    }

    pub fn plain(venue: Venue) -> Self {
        Self { venue, fee_tier: None }
    }

    /// Every `(venue, fee_tier)` option in deterministic search order:
    /// venue declaration order, fee tiers ascending.
    pub fn all() -> Vec<VenueSelection> {
        Venue::iter()
            .flat_map(|venue| venue.fee_tiers().into_iter().map(move |fee_tier| VenueSelection { venue, fee_tier }))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        match self.venue.kind() {
            VenueKind::ConcentratedLiquidity => self.fee_tier.is_some_and(|fee| CONCENTRATED_FEE_TIERS.contains(&fee)),
            _ => self.fee_tier.is_none(),
        }
    }
}

impl Display for VenueSelection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.fee_tier {
            Some(fee) => write!(f, "{}({})", self.venue, fee),
            None => write!(f, "{}", self.venue),
        }
    }
}
