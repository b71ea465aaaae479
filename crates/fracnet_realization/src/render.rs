//! Renderer boundary.
//!
//! Rendering is a consumer of the model: a [`Renderer`] receives layers,
//! fracture perimeters and domain faces and never mutates what it is given.
//! [`PolylineRenderer`] is the built-in implementation; it flattens
//! everything into `perimeters.tsv`.

use fracnet_model::{BoxFace, Fracture, FractureSetModel};
use nalgebra::Point3;

use crate::error::Result;
use crate::report::{finish_tsv, tsv_writer};

/// Receives a realization's geometry for drawing.
pub trait Renderer {
    /// Starts a new layer. Fractures are drawn on the layer named after
    /// their group.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn begin_layer(&mut self, layer: &str) -> Result<()>;

    /// Draws one fracture with its sampled perimeter.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn draw_fracture(
        &mut self,
        layer: &str,
        fracture: &Fracture,
        perimeter: &[Point3<f64>],
    ) -> Result<()>;

    /// Draws one domain box face on the face's own layer.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn draw_face(&mut self, face: &BoxFace) -> Result<()>;
}

/// Sends every group and face of a realization to `renderer`.
///
/// # Errors
///
/// Propagates the first renderer error.
pub fn render_model(
    renderer: &mut dyn Renderer,
    model: &FractureSetModel,
    faces: &[BoxFace],
    perimeter_points: usize,
) -> Result<()> {
    for group in model.groups() {
        renderer.begin_layer(group.name())?;
        for fracture in group.iter() {
            let perimeter = fracture.perimeter(perimeter_points);
            renderer.draw_fracture(group.name(), fracture, &perimeter)?;
        }
    }
    for face in faces {
        renderer.draw_face(face)?;
    }
    Ok(())
}

/// Renders geometry as `layer, name, vertex, x, y, z` rows.
pub struct PolylineRenderer {
    writer: csv::Writer<Vec<u8>>,
    rows: usize,
}

impl std::fmt::Debug for PolylineRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolylineRenderer")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

impl Default for PolylineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolylineRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: tsv_writer(),
            rows: 0,
        }
    }

    /// Rows written so far.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Finishes rendering and returns the TSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered writer cannot be flushed.
    pub fn into_report(self) -> Result<String> {
        finish_tsv(self.writer)
    }

    fn write_polyline(&mut self, layer: &str, name: &str, points: &[Point3<f64>]) -> Result<()> {
        for (vertex, p) in points.iter().enumerate() {
            self.writer.write_record([
                layer.to_string(),
                name.to_string(),
                vertex.to_string(),
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
            ])?;
            self.rows += 1;
        }
        Ok(())
    }
}

impl Renderer for PolylineRenderer {
    fn begin_layer(&mut self, _layer: &str) -> Result<()> {
        Ok(())
    }

    fn draw_fracture(
        &mut self,
        layer: &str,
        fracture: &Fracture,
        perimeter: &[Point3<f64>],
    ) -> Result<()> {
        self.write_polyline(layer, fracture.name(), perimeter)
    }

    fn draw_face(&mut self, face: &BoxFace) -> Result<()> {
        self.write_polyline(&face.layer, &face.layer, &face.corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fracnet_model::{fracture_name, DomainSpec, Shape};
    use nalgebra::Vector3;

    #[derive(Default)]
    struct Recorder {
        layers: Vec<String>,
        fractures: Vec<(String, String, usize)>,
        faces: Vec<String>,
    }

    impl Renderer for Recorder {
        fn begin_layer(&mut self, layer: &str) -> Result<()> {
            self.layers.push(layer.to_string());
            Ok(())
        }

        fn draw_fracture(
            &mut self,
            layer: &str,
            fracture: &Fracture,
            perimeter: &[Point3<f64>],
        ) -> Result<()> {
            self.fractures
                .push((layer.to_string(), fracture.name().to_string(), perimeter.len()));
            Ok(())
        }

        fn draw_face(&mut self, face: &BoxFace) -> Result<()> {
            self.faces.push(face.layer.clone());
            Ok(())
        }
    }

    fn model() -> FractureSetModel {
        ["A", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, group)| {
                Fracture::new(fracture_name(i), Point3::origin(), Vector3::z(), Shape::disc(1.0))
                    .unwrap()
                    .with_group(*group)
            })
            .collect()
    }

    #[test]
    fn render_model_visits_groups_then_faces() {
        let spec = DomainSpec::new(Point3::origin(), 2.0, 1.0, 1.0).unwrap();
        let mut recorder = Recorder::default();
        render_model(&mut recorder, &model(), &spec.faces(2.0, ""), 12).unwrap();

        assert_eq!(recorder.layers, ["A", "B"]);
        assert_eq!(recorder.fractures.len(), 3);
        assert_eq!(recorder.fractures[1].1, "FRACTURE00002_S");
        assert!(recorder.fractures.iter().all(|f| f.2 == 12));
        assert_eq!(recorder.faces.len(), 6);
    }

    #[test]
    fn polyline_renderer_writes_every_vertex() {
        let spec = DomainSpec::new(Point3::origin(), 2.0, 1.0, 1.0).unwrap();
        let mut renderer = PolylineRenderer::new();
        render_model(&mut renderer, &model(), &spec.faces(2.0, ""), 8).unwrap();

        assert_eq!(renderer.rows(), 3 * 8 + 6 * 4);
        let report = renderer.into_report().unwrap();
        let first = report.lines().next().unwrap();
        assert!(first.starts_with("A\tFRACTURE00000_S\t0\t"));
        assert!(report.lines().any(|l| l.starts_with("TOP\tTOP\t3\t")));
    }
}
