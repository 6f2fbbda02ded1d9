//! The `item` query: filter, gather, aggregate
//!
//! ```sql
//! select
//!   100 * (sum(price * discount) / sum(price))   as discount_ratio,
//!   (avg(price) filter (where discount = 0.05))  as avg_price
//! from item
//! where (discount between .05 and .07 and quantity < 24 and status = 'A')
//!    or comment like 'PROMO%SUMMER'
//! ```
//!
//! The shape of the query is fixed. Its literals live in [`QueryParams`],
//! whose defaults are the values above.

use crate::error::{Error, Result};
use crate::execution::batch::{AggregatedBatch, FilteredBatch, InputBatch};
use crate::execution::gather::gather_batch;
use crate::execution::operators::VectorizedOperators;
use crate::execution::predicates::{LikePattern, PROMO_SUMMER};
use crate::execution::selection::SelectionVector;
use serde::{Deserialize, Serialize};

/// Literals of the `item` query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Lower bound of `discount between`, inclusive
    pub discount_min: f64,
    /// Upper bound of `discount between`, inclusive
    pub discount_max: f64,
    /// Exclusive upper bound of `quantity`
    pub quantity_below: i32,
    /// Required `status` byte
    #[serde(with = "single_byte")]
    pub status: u8,
    /// `comment LIKE` pattern
    pub comment_pattern: LikePattern,
    /// Discount selecting the rows of the filtered average
    pub avg_discount: f64,
    /// Tolerance of the `discount = avg_discount` comparison
    pub discount_tolerance: f64,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            discount_min: 0.05,
            discount_max: 0.07,
            quantity_below: 24,
            status: b'A',
            comment_pattern: PROMO_SUMMER,
            avg_discount: 0.05,
            discount_tolerance: 1e-6,
        }
    }
}

impl QueryParams {
    /// Reject parameter sets the kernel cannot evaluate meaningfully
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("discount_min", self.discount_min),
            ("discount_max", self.discount_max),
            ("avg_discount", self.avg_discount),
            ("discount_tolerance", self.discount_tolerance),
        ] {
            if !value.is_finite() {
                return Err(Error::config(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.discount_min > self.discount_max {
            return Err(Error::config(format!(
                "discount_min {} is greater than discount_max {}",
                self.discount_min, self.discount_max
            )));
        }
        if self.discount_tolerance < 0.0 {
            return Err(Error::config(format!(
                "discount_tolerance must not be negative, got {}",
                self.discount_tolerance
            )));
        }
        Ok(())
    }
}

/// Compiled `item` query over one batch at a time
pub struct ItemQuery {
    params: QueryParams,
    operators: VectorizedOperators,
}

impl ItemQuery {
    /// Build a query after validating its parameters
    pub fn new(params: QueryParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            operators: VectorizedOperators::new(),
        })
    }

    /// The query with its reference literals
    pub fn reference() -> Self {
        Self {
            params: QueryParams::default(),
            operators: VectorizedOperators::new(),
        }
    }

    /// Query literals
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Rows of `input` satisfying the WHERE clause
    pub fn selection(&self, input: &InputBatch) -> Result<SelectionVector> {
        #[cfg(feature = "parallel")]
        let (conjunction, like) = rayon::join(
            || self.conjunction_branch(input),
            || self.like_branch(input),
        );
        #[cfg(not(feature = "parallel"))]
        let (conjunction, like) = (self.conjunction_branch(input), self.like_branch(input));

        Ok(self.operators.merge_or(&conjunction?, &like?))
    }

    /// WHERE clause followed by gather
    pub fn filter(&self, input: &InputBatch) -> Result<FilteredBatch> {
        let selection = self.selection(input)?;
        gather_batch(input, &selection)
    }

    /// Single pass over the filtered rows
    ///
    /// An empty batch gives a NaN `discount_ratio`; no row at the target
    /// discount gives a NaN `avg_price`.
    pub fn aggregate(&self, input: &FilteredBatch) -> AggregatedBatch {
        let columns = input.columns();
        let target = self.params.avg_discount;
        let tolerance = self.params.discount_tolerance;

        let mut sum_price = 0.0f64;
        let mut sum_weighted = 0.0f64;
        let mut target_count = 0usize;
        let mut target_price = 0.0f64;

        for (&price, &discount) in columns.price.iter().zip(&columns.discount) {
            sum_weighted += price * discount;
            sum_price += price;

            if (discount - target).abs() < tolerance {
                target_count += 1;
                target_price += price;
            }
        }

        let discount_ratio = 100.0 * (sum_weighted / sum_price);
        let avg_price = target_price / target_count as f64;

        tracing::debug!(
            rows = input.num_rows(),
            target_rows = target_count,
            discount_ratio,
            avg_price,
            "aggregate complete"
        );

        AggregatedBatch::new(discount_ratio, avg_price)
    }

    /// Filter and aggregate in one call
    pub fn execute(&self, input: &InputBatch) -> Result<AggregatedBatch> {
        let filtered = self.filter(input)?;
        Ok(self.aggregate(&filtered))
    }

    // discount between .. and quantity < .. and status = ..
    fn conjunction_branch(&self, input: &InputBatch) -> Result<SelectionVector> {
        let columns = input.columns();
        let p = &self.params;

        let by_discount = self
            .operators
            .select_between_f64(&columns.discount, p.discount_min, p.discount_max)?;
        let by_quantity = self
            .operators
            .refine_less_i32(&by_discount, &columns.quantity, p.quantity_below);
        Ok(self
            .operators
            .refine_equal_char(&by_quantity, &columns.status, p.status))
    }

    fn like_branch(&self, input: &InputBatch) -> Result<SelectionVector> {
        self.operators.select_like(
            &input.columns().comment,
            input.num_rows(),
            &self.params.comment_pattern,
        )
    }
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self::reference()
    }
}

/// Run the WHERE clause of the reference query and compact the batch
pub fn filter(input: &InputBatch) -> Result<FilteredBatch> {
    ItemQuery::reference().filter(input)
}

/// Compute the reference query's two aggregates
pub fn aggregate(input: &FilteredBatch) -> AggregatedBatch {
    ItemQuery::reference().aggregate(input)
}

mod single_byte {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&char::from(*byte).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(D::Error::custom(format!(
                "expected a single-byte literal, got {:?}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::batch::ItemColumns;
    use crate::execution::columnar::StringColumn;

    fn batch(discount: Vec<f64>, price: Vec<f64>) -> InputBatch {
        let rows = price.len();
        InputBatch::new(ItemColumns {
            quantity: vec![1; rows],
            price,
            discount,
            status: StringColumn::from_values(vec!["A"; rows]).unwrap(),
            comment: StringColumn::from_values(vec![""; rows]).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_default_params() {
        let params = QueryParams::default();
        assert_eq!(params.status, b'A');
        assert_eq!(params.comment_pattern.to_string(), "PROMO%SUMMER");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let inverted = QueryParams {
            discount_min: 0.1,
            discount_max: 0.05,
            ..QueryParams::default()
        };
        assert!(matches!(ItemQuery::new(inverted), Err(Error::Config(_))));

        let nan = QueryParams {
            avg_discount: f64::NAN,
            ..QueryParams::default()
        };
        assert!(nan.validate().is_err());

        let negative = QueryParams {
            discount_tolerance: -1.0,
            ..QueryParams::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_params_serde_defaults() {
        let params: QueryParams =
            serde_json::from_str(r#"{"quantity_below": 10, "status": "N"}"#).unwrap();

        assert_eq!(params.quantity_below, 10);
        assert_eq!(params.status, b'N');
        assert_eq!(params.discount_max, 0.07);

        assert!(serde_json::from_str::<QueryParams>(r#"{"status": "AR"}"#).is_err());
        assert!(serde_json::from_str::<QueryParams>(r#"{"comment_pattern": "PROMO"}"#).is_err());
    }

    #[test]
    fn test_aggregate_matches_hand_computation() {
        let input = batch(vec![0.05, 0.07], vec![10.0, 20.0]);
        let query = ItemQuery::reference();
        let filtered = query.filter(&input).unwrap();
        let result = query.aggregate(&filtered);

        // 100 * (10*0.05 + 20*0.07) / 30
        assert!((result.discount_ratio() - 100.0 * 1.9 / 30.0).abs() < 1e-12);
        assert_eq!(result.avg_price(), 10.0);
    }

    #[test]
    fn test_aggregate_empty_batch_is_nan() {
        let query = ItemQuery::reference();
        let filtered = query.filter(&batch(vec![0.01], vec![5.0])).unwrap();
        assert_eq!(filtered.num_rows(), 0);

        let result = query.aggregate(&filtered);
        assert!(result.discount_ratio().is_nan());
        assert!(result.avg_price().is_nan());
    }

    #[test]
    fn test_aggregate_without_target_discount() {
        let query = ItemQuery::reference();
        let filtered = query.filter(&batch(vec![0.06], vec![5.0])).unwrap();
        let result = query.aggregate(&filtered);

        assert!((result.discount_ratio() - 6.0).abs() < 1e-9);
        assert!(result.avg_price().is_nan());
    }

    #[test]
    fn test_custom_status_literal() {
        let input = batch(vec![0.05, 0.05], vec![1.0, 2.0]);
        let query = ItemQuery::new(QueryParams {
            status: b'N',
            ..QueryParams::default()
        })
        .unwrap();

        assert!(query.selection(&input).unwrap().is_empty());
    }
}
