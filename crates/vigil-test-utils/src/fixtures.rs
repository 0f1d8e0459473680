//! Canned attribute bags and a record builder.

use vigil_core::{
    AttrValue, AttributeBag, SubjectId, SubjectType, NESTED_COLLECTION_KEY,
};
use vigil_wire::StateRecord;

/// A flat two-attribute climate bag: `temperature` and `humidity`.
pub fn climate_bag(temperature: f64, humidity: f64) -> AttributeBag {
    let mut bag = AttributeBag::new();
    bag.set("temperature", AttrValue::Number(temperature));
    bag.set("humidity", AttrValue::Number(humidity));
    bag
}

/// A single cell's bag: `soil` text and `water` level.
pub fn cell_bag(soil: &str, water: f64) -> AttributeBag {
    let mut bag = AttributeBag::new();
    bag.set("soil", AttrValue::Text(soil.into()));
    bag.set("water", AttrValue::Number(water));
    bag
}

/// A trajectory bag with `temperature` plus `cell_count` nested cells
/// under the reserved collection key. Cell ids start at 100.
pub fn trajectory_bag(temperature: f64, cell_count: u32) -> AttributeBag {
    let mut bag = AttributeBag::new();
    bag.set("temperature", AttrValue::Number(temperature));
    for i in 0..cell_count {
        bag.push_nested(
            NESTED_COLLECTION_KEY,
            SubjectId(100 + i),
            SubjectType::Cell,
            cell_bag("clay", f64::from(i)),
        );
    }
    bag
}

/// Fluent builder for [`StateRecord`] test values.
pub struct RecordBuilder {
    record: StateRecord,
}

impl RecordBuilder {
    pub fn new(id: u32, subject_type: SubjectType) -> Self {
        Self {
            record: StateRecord::new(SubjectId(id), subject_type),
        }
    }

    pub fn number(mut self, key: &str, value: f64) -> Self {
        self.record.push_attribute(key, AttrValue::Number(value));
        self
    }

    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.record.push_attribute(key, AttrValue::Text(value.into()));
        self
    }

    pub fn flag(mut self, key: &str, value: bool) -> Self {
        self.record.push_attribute(key, AttrValue::Bool(value));
        self
    }

    pub fn nested(mut self, child: StateRecord) -> Self {
        self.record.push_nested(child);
        self
    }

    pub fn build(self) -> StateRecord {
        self.record
    }
}
