//! Domain filtering of fracture networks.

use std::collections::BTreeSet;

use crate::domain::DomainBox;
use crate::model::{Fracture, FractureSetModel};

/// Returns true if the fracture center lies inside `domain_box`.
pub fn classify(fracture: &Fracture, domain_box: &DomainBox) -> bool {
    domain_box.contains(fracture.center())
}

/// Returns a new model holding the fractures inside `domain_box`.
///
/// Groups named in `exempt_groups` are copied whole. Group order is kept and
/// groups emptied by the filter are retained.
pub fn filter<S: AsRef<str>>(
    model: &FractureSetModel,
    domain_box: &DomainBox,
    exempt_groups: &[S],
) -> FractureSetModel {
    let exempt: BTreeSet<&str> = exempt_groups.iter().map(AsRef::as_ref).collect();
    let mut filtered = FractureSetModel::new();

    for group in model.groups() {
        filtered.get_or_create(group.name());
        let keep_all = exempt.contains(group.name());
        for fracture in group.iter() {
            if keep_all || classify(fracture, domain_box) {
                filtered.insert(fracture.clone());
            }
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;
    use crate::model::fracture_name;
    use nalgebra::{Point3, Vector3};
    use proptest::prelude::*;

    fn at(index: usize, x: f64, group: &str) -> Fracture {
        Fracture::new(
            fracture_name(index),
            Point3::new(x, 0.0, 0.0),
            Vector3::z(),
            Shape::disc(0.5),
        )
        .unwrap()
        .with_group(group)
    }

    #[test]
    fn classify_uses_center_only() {
        let domain_box = DomainBox::cube(Point3::origin(), 1.0);
        assert!(classify(&at(0, 0.99, "A"), &domain_box));
        assert!(!classify(&at(0, 1.01, "A"), &domain_box));
    }

    #[test]
    fn filter_drops_outside_fractures() {
        let model: FractureSetModel = vec![at(0, 0.0, "A"), at(1, 5.0, "A"), at(2, -0.5, "A")]
            .into_iter()
            .collect();

        let filtered = filter(&model, &DomainBox::cube(Point3::origin(), 1.0), &[] as &[&str]);
        let names: Vec<_> = filtered.fractures().map(Fracture::name).collect();
        assert_eq!(names, vec!["FRACTURE00000_S", "FRACTURE00002_S"]);
    }

    #[test]
    fn filter_keeps_exempt_groups_whole() {
        let model: FractureSetModel = vec![at(0, 5.0, "WELLS"), at(1, 5.0, "A"), at(2, 0.0, "A")]
            .into_iter()
            .collect();

        let filtered = filter(&model, &DomainBox::cube(Point3::origin(), 1.0), &["WELLS"]);
        assert_eq!(filtered.group("WELLS").unwrap().len(), 1);
        assert_eq!(filtered.group("A").unwrap().len(), 1);
    }

    #[test]
    fn filter_retains_emptied_groups() {
        let model: FractureSetModel = vec![at(0, 9.0, "FAR")].into_iter().collect();
        let filtered = filter(&model, &DomainBox::cube(Point3::origin(), 1.0), &[] as &[&str]);

        assert_eq!(filtered.group_count(), 1);
        assert!(filtered.is_empty());
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_the_inside_fractures(
            xs in proptest::collection::vec(-3.0f64..3.0, 0..20),
            half in 0.1f64..3.0,
            reduce in 0.05f64..=1.0,
        ) {
            let model: FractureSetModel = xs
                .iter()
                .enumerate()
                .map(|(i, &x)| at(i, x, "A"))
                .collect();
            let domain_box = DomainBox::cube(Point3::origin(), half).with_lateral_reduction(reduce);
            let filtered = filter(&model, &domain_box, &[] as &[&str]);

            let expected = xs.iter().filter(|x| x.abs() <= half * reduce).count();
            prop_assert_eq!(filtered.len(), expected);
            for fracture in filtered.fractures() {
                prop_assert!(domain_box.contains(fracture.center()));
            }
        }
    }
}
