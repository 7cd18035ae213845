use super::{Category, StateSchema};
use crate::Real;
use ndarray::Array1;
use paste::paste;
use std::ops::Range;

/// Per-category indicator vectors over the population vector.
///
/// The aggregate population of a category is the dot product of its
/// indicator with the population vector. Indicators are built once with
/// the schema and reused every step.
#[derive(Clone, Debug)]
pub struct CategoryIndex {
    indicators: Vec<Array1<Real>>,
    ranges: Vec<Range<usize>>,
    len: usize,
}

macro_rules! category_total {
    ($name:ident, $cat:ident) => {
        paste! {
            #[doc = "Aggregate `" $cat "` population."]
            pub fn [<$name _total>](&self, x: &Array1<Real>) -> Real {
                self.total(Category::$cat, x)
            }
        }
    };
}

impl CategoryIndex {
    pub fn new(schema: &StateSchema) -> Self {
        let len = schema.len();
        let ranges: Vec<_> = Category::ALL.iter().map(|&cat| schema.chain(cat)).collect();
        let indicators = ranges
            .iter()
            .map(|r| Array1::from_shape_fn(len, |i| if r.contains(&i) { 1.0 } else { 0.0 }))
            .collect();
        CategoryIndex {
            indicators,
            ranges,
            len,
        }
    }

    /// Length of the population vectors this index applies to.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 0/1 vector selecting all sub-states of the category.
    pub fn indicator(&self, category: Category) -> &Array1<Real> {
        &self.indicators[category.ordinal()]
    }

    /// 0/1 vector selecting the sub-states of any of the given categories.
    pub fn indicator_of(&self, categories: &[Category]) -> Array1<Real> {
        let mut out = Array1::zeros(self.len);
        for &cat in categories {
            out += self.indicator(cat);
        }
        out
    }

    /// Positions of the category in the population vector.
    pub fn range(&self, category: Category) -> Range<usize> {
        self.ranges[category.ordinal()].clone()
    }

    /// Position of the first cohort of a chain, or of a single state.
    pub fn head(&self, category: Category) -> Option<usize> {
        let r = self.range(category);
        if r.is_empty() {
            None
        } else {
            Some(r.start)
        }
    }

    /// Position of the last cohort of a chain, or of a single state.
    pub fn tail(&self, category: Category) -> Option<usize> {
        let r = self.range(category);
        if r.is_empty() {
            None
        } else {
            Some(r.end - 1)
        }
    }

    /// Aggregate population of the category.
    pub fn total(&self, category: Category, x: &Array1<Real>) -> Real {
        self.indicator(category).dot(x)
    }

    /// Aggregate population of every category, in [`Category::ALL`] order.
    pub fn totals(&self, x: &Array1<Real>) -> [Real; Category::CARDINALITY] {
        let mut out = [0.0; Category::CARDINALITY];
        for (o, ind) in out.iter_mut().zip(&self.indicators) {
            *o = ind.dot(x);
        }
        out
    }

    /// Everybody but the Birth source and the Dead sink.
    pub fn living_total(&self, x: &Array1<Real>) -> Real {
        let n = self.len;
        if n < 2 {
            return 0.0;
        }
        x.slice(ndarray::s![1..n - 1]).sum()
    }

    /// Immunized population, regardless of how immunity was acquired.
    pub fn immunized_total(&self, x: &Array1<Real>) -> Real {
        self.total(Category::VaccinationImmunized, x)
            + self.total(Category::MaternallyImmunized, x)
            + self.total(Category::RecoveryImmunized, x)
    }

    category_total!(susceptible, Susceptible);
    category_total!(vaccinated, Vaccinated);
    category_total!(exposed, Exposed);
    category_total!(quarantined, Quarantined);
    category_total!(infected, Infected);
    category_total!(severe, Severe);
    category_total!(dead, Dead);
}
