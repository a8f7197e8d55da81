//! Shared bindings for the integration tests.
#![allow(dead_code)]

use json_bind::{BinaryValue, Reader, TypeBuilder, TypeRegistry, Writer};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Color {
    #[default]
    Red,
    Green,
    Blue,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl BinaryValue for Rgb {
    fn write_binary(&self, out: &mut Writer) {
        out.buf(&[self.0, self.1, self.2]);
    }

    fn from_binary(bytes: &[u8]) -> Option<Self> {
        let mut reader = Reader::new(bytes);
        let rgb = Rgb(reader.u8().ok()?, reader.u8().ok()?, reader.u8().ok()?);
        reader.is_empty().then_some(rgb)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub color: Color,
    pub scale: f64,
    pub visible: bool,
    pub origin: Point,
    pub points: Vec<Point>,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub fill: Option<Rgb>,
    pub parent: Option<Box<Shape>>,
    pub weights: Vec<Option<i64>>,
    pub children: Vec<Box<Shape>>,
    pub blob: Vec<u8>,
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    for descriptor in [
        TypeBuilder::structure::<Point>("Point")
            .member("x", "i32", |p| &p.x, |p| &mut p.x)
            .member("y", "i32", |p| &p.y, |p| &mut p.y)
            .build(),
        TypeBuilder::enumeration::<Color>("Color")
            .variant("red", 0, Color::Red)
            .variant("green", 1, Color::Green)
            .variant("blue", 2, Color::Blue)
            .build(),
        TypeBuilder::binary::<Rgb>("Rgb"),
        TypeBuilder::container::<Point>("Points", "Point"),
        TypeBuilder::container::<String>("Strings", "string"),
        TypeBuilder::container::<i32>("I32s", "i32"),
        TypeBuilder::container::<f64>("F64s", "f64"),
        TypeBuilder::nullable_container::<i64>("Weights", "i64"),
        TypeBuilder::boxed_container::<Shape>("Shapes", "Shape"),
        TypeBuilder::nullable_boxed_container::<Shape>("MaybeShapes", "Shape"),
        TypeBuilder::structure::<Shape>("Shape")
            .member("name", "string", |s| &s.name, |s| &mut s.name)
            .member("color", "Color", |s| &s.color, |s| &mut s.color)
            .member("scale", "f64", |s| &s.scale, |s| &mut s.scale)
            .member("visible", "bool", |s| &s.visible, |s| &mut s.visible)
            .member("origin", "Point", |s| &s.origin, |s| &mut s.origin)
            .member("points", "Points", |s| &s.points, |s| &mut s.points)
            .member("tags", "Strings", |s| &s.tags, |s| &mut s.tags)
            .nullable_member("note", "string", |s| &s.note, |s| &mut s.note)
            .nullable_member("fill", "Rgb", |s| &s.fill, |s| &mut s.fill)
            .boxed_member("parent", "Shape", |s| &s.parent, |s| &mut s.parent)
            .member("weights", "Weights", |s| &s.weights, |s| &mut s.weights)
            .member("children", "Shapes", |s| &s.children, |s| &mut s.children)
            .member("blob", "bytes", |s| &s.blob, |s| &mut s.blob)
            .build(),
    ] {
        registry.register(descriptor).unwrap();
    }
    registry.check().unwrap();
    registry
}

pub fn sample_shape() -> Shape {
    Shape {
        name: "tri\"angle\"\n".to_string(),
        color: Color::Green,
        scale: -1.25,
        visible: true,
        origin: Point { x: -3, y: 4 },
        points: vec![Point { x: 0, y: 0 }, Point { x: 10, y: -10 }],
        tags: vec!["a".to_string(), "é😀".to_string()],
        note: None,
        fill: Some(Rgb(255, 0, 128)),
        parent: Some(Box::new(Shape {
            name: "root".to_string(),
            ..Shape::default()
        })),
        weights: vec![Some(1), None, Some(-9_007_199_254_740_993)],
        children: vec![Box::new(Shape {
            name: "child".to_string(),
            color: Color::Blue,
            ..Shape::default()
        })],
        blob: vec![0, 1, 2, 253, 254, 255],
    }
}
