use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BotStatus {
  Pending,
  Running,
  Stopping,
  Stopped
}

impl BotStatus {
  pub const ALL: [BotStatus; 4] = [BotStatus::Pending, BotStatus::Running, BotStatus::Stopping, BotStatus::Stopped];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::Running => "Running",
      Self::Stopping => "Stopping",
      Self::Stopped => "Stopped",
    }
  }

  pub fn wire_name(&self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Running => "RUNNING",
      Self::Stopping => "STOPPING",
      Self::Stopped => "STOPPED",
    }
  }

  pub fn from_wire(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|status| status.wire_name() == s)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
  Ordered,
  #[serde(alias = "CANCELLED")]
  Canceled
}

impl OrderStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Ordered => "Ordered",
      Self::Canceled => "Canceled",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  Done,
  Canceled,
  PartialCanceled,
  Aborted,
  Expired
}

impl PaymentStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Done => "Paid",
      Self::Canceled => "Canceled",
      Self::PartialCanceled => "Partially canceled",
      Self::Aborted => "Aborted",
      Self::Expired => "Expired",
    }
  }

  // only a completed payment adds to the balance
  pub fn is_credit(&self) -> bool {
    matches!(self, Self::Done)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointStatus {
  Charge,
  Use
}

impl PointStatus {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Charge => "Charge",
      Self::Use => "Use",
    }
  }

  pub fn sign(&self) -> char {
    match self {
      Self::Charge => '+',
      Self::Use => '-',
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exchange {
  Binance,
  Upbit,
  Bitget
}

impl Exchange {
  pub const ALL: [Exchange; 3] = [Exchange::Binance, Exchange::Upbit, Exchange::Bitget];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Binance => "Binance",
      Self::Upbit => "Upbit",
      Self::Bitget => "Bitget",
    }
  }

  pub fn wire_name(&self) -> &'static str {
    match self {
      Self::Binance => "BINANCE",
      Self::Upbit => "UPBIT",
      Self::Bitget => "BITGET",
    }
  }

  pub fn from_wire(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|exchange| exchange.wire_name() == s)
  }
}

/// Marketplace listing order, sent as the `sortOption` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOption {
  #[default]
  Default,
  Latest,
  PriceDesc,
  PriceAsc
}

impl SortOption {
  pub const ALL: [SortOption; 4] = [SortOption::Default, SortOption::Latest, SortOption::PriceDesc, SortOption::PriceAsc];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Default => "Default",
      Self::Latest => "Latest",
      Self::PriceDesc => "Price (High to Low)",
      Self::PriceAsc => "Price (Low to High)",
    }
  }

  pub fn as_query(&self) -> &'static str {
    match self {
      Self::Default => "DEFAULT",
      Self::Latest => "LATEST",
      Self::PriceDesc => "PRICE_DESC",
      Self::PriceAsc => "PRICE_ASC",
    }
  }

  pub fn from_query(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|opt| opt.as_query() == s)
  }
}

macro_rules! display_by_label {
  ($($ty:ty),*) => {
    $(impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
      }
    })*
  };
}

display_by_label!(BotStatus, OrderStatus, PaymentStatus, PointStatus, Exchange, SortOption);
