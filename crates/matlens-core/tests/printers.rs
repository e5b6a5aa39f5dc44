//! End-to-end tests: catalog lookup, layout resolution and rendering over a
//! snapshot image

use matlens_core::catalog::{default_collection, PrinterCollection, PrinterKind};
use matlens_core::error::PrinterError;
use matlens_core::printer::{DisplayHint, Printer};
use matlens_core::render::{collect_cells, render, RenderOptions};
use matlens_core::resolver::{resolve, LayoutRule};
use matlens_core::snapshot::{MemoryImage, Scalar, ScalarType, SnapshotTarget, SnapshotValue};
use matlens_core::types::{Address, ShapeDescriptor};

const BASE: u64 = 0x7f00_0000_1000;

fn target_with_longs(values: &[i64]) -> SnapshotTarget
{
    let mut image = MemoryImage::new();
    let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    image.map(Address::from(BASE), bytes, Some("[heap]".to_string())).unwrap();
    SnapshotTarget::new(image)
}

fn target_with_doubles(values: &[f64]) -> SnapshotTarget
{
    let mut image = MemoryImage::new();
    let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    image.map(Address::from(BASE), bytes, None).unwrap();
    SnapshotTarget::new(image)
}

fn ptr(element: &str) -> SnapshotValue
{
    SnapshotValue::pointer(format!("{element} *"), Address::from(BASE))
}

fn dims(type_name: &str, fields: &[(&str, i64)]) -> SnapshotValue
{
    SnapshotValue::structure(
        type_name,
        fields.iter().map(|(name, value)| (*name, SnapshotValue::long(*value))),
    )
}

fn array(type_name: &str, element: &str, sz: SnapshotValue) -> SnapshotValue
{
    SnapshotValue::structure(type_name, [("ptr", ptr(element)), ("sz", sz)])
}

fn texts(printer: &Printer<'_, SnapshotTarget>) -> Vec<String>
{
    printer.children().unwrap().map(|cell| cell.text).collect()
}

#[test]
fn test_vector_printer()
{
    let target = target_with_longs(&[4, -5, 6]);
    let value = array(
        "LinAlg::Array<long, unsigned int>",
        "long",
        SnapshotValue::unsigned(3),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();

    assert_eq!(printer.summary(), "Vector of size: 3");
    assert_eq!(printer.display_hint(), Some(DisplayHint::Array));
    assert_eq!(printer.display_hint().unwrap().as_str(), "array");
    let labels: Vec<String> = printer.children().unwrap().map(|cell| cell.label.to_string()).collect();
    assert_eq!(labels, ["[0]", "[1]", "[2]"]);
    assert_eq!(texts(&printer), ["4", "-5", "6"]);
}

#[test]
fn test_managed_vector_printer()
{
    let target = target_with_longs(&[1, 2]);
    let value = array(
        "LinAlg::ManagedArray<long, unsigned int, 16, std::allocator<long>, unsigned int>",
        "long",
        SnapshotValue::unsigned(2),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    assert_eq!(render(&printer, &RenderOptions::default()), "Vector of size: 2 = {1, 2}");
}

#[test]
fn test_empty_vector()
{
    let target = SnapshotTarget::new(MemoryImage::new());
    let value = array(
        "LinAlg::Array<double, unsigned int>",
        "double",
        SnapshotValue::unsigned(0),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    assert_eq!(printer.summary(), "Vector of size: 0");
    assert!(texts(&printer).is_empty());
    assert_eq!(render(&printer, &RenderOptions::default()), "Vector of size: 0 = {}");
}

#[test]
fn test_dense_matrix_printer()
{
    let target = target_with_doubles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let value = array(
        "LinAlg::Array<double, LinAlg::DenseDims>",
        "double",
        dims("LinAlg::DenseDims", &[("M", 2), ("N", 3)]),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();

    assert_eq!(printer.summary(), "Matrix, 2 x 3:\n");
    assert_eq!(texts(&printer), [" 1", " 2", " 3", "\n     4", " 5", " 6 "]);
    assert_eq!(
        render(&printer, &RenderOptions::unlimited()),
        "Matrix, 2 x 3:\n = { 1,  2,  3, \n     4,  5,  6 }"
    );
}

#[test]
fn test_square_matrix_reads_single_order()
{
    let target = target_with_longs(&[1, -2, -3, 4]);
    let value = array(
        "LinAlg::Array<long, LinAlg::SquareDims>",
        "long",
        dims("LinAlg::SquareDims", &[("M", 2)]),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    assert_eq!(printer.summary(), "Matrix, 2 x 2:\n");
    assert_eq!(texts(&printer), [" 1", "-2", "\n    -3", " 4 "]);
}

#[test]
fn test_strided_matrix_printer()
{
    let target = target_with_longs(&[1, 2, 9, 3, 4, 9]);
    let value = array(
        "LinAlg::Array<long, LinAlg::StridedDims>",
        "long",
        dims("LinAlg::StridedDims", &[("M", 2), ("N", 2), ("strideM", 3)]),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();

    assert_eq!(printer.summary(), "Matrix, 2 x 2, stride 3:\n");
    let cells = collect_cells(&printer, &RenderOptions::default());
    assert!(!cells.truncated);
    let texts: Vec<&str> = cells.cells.iter().map(|cell| cell.text.as_str()).collect();
    assert_eq!(texts, [" 1", " 2", "\n     3", " 4 "]);
}

#[test]
fn test_resolver_shapes()
{
    let target = target_with_longs(&[0; 4]);
    let strided = array(
        "LinAlg::Array<int, LinAlg::StridedDims>",
        "int",
        dims("LinAlg::StridedDims", &[("M", 3), ("N", 2), ("strideM", 8)]),
    );
    let layout = resolve(&target, &strided, LayoutRule::StridedMatrix).unwrap();
    assert_eq!(
        layout.shape,
        ShapeDescriptor::Strided {
            rows: 3,
            cols: 2,
            stride_rows: 8
        }
    );
    assert_eq!(layout.pointer.address, Address::from(BASE));
    assert_eq!(layout.pointer.element_type, ScalarType::I32);
}

#[test]
fn test_missing_field_is_mismatch()
{
    let target = target_with_longs(&[0; 4]);
    let value = array(
        "LinAlg::Array<long, LinAlg::DenseDims>",
        "long",
        dims("LinAlg::DenseDims", &[("M", 2)]),
    );
    let err = resolve(&target, &value, LayoutRule::DenseMatrix).unwrap_err();
    assert!(err.is_mismatch());
    assert!(matches!(&err, PrinterError::PatternMismatch { missing, .. } if missing == "field sz.N"));

    assert!(default_collection().unwrap().lookup(&target, &value).is_none());
}

#[test]
fn test_negative_dimension_rejected()
{
    let target = target_with_longs(&[0; 4]);
    let value = array(
        "LinAlg::Array<long, LinAlg::DenseDims>",
        "long",
        dims("LinAlg::DenseDims", &[("M", -1), ("N", 2)]),
    );
    let err = resolve(&target, &value, LayoutRule::DenseMatrix).unwrap_err();
    assert!(matches!(err, PrinterError::InvalidDimension { value: -1, .. }));
    assert!(err.is_mismatch());
}

#[test]
fn test_stride_below_cols_rejected()
{
    let target = target_with_longs(&[0; 4]);
    let value = array(
        "LinAlg::Array<long, LinAlg::StridedDims>",
        "long",
        dims("LinAlg::StridedDims", &[("M", 2), ("N", 3), ("strideM", 2)]),
    );
    assert!(matches!(
        resolve(&target, &value, LayoutRule::StridedMatrix),
        Err(PrinterError::InvalidDimension { .. })
    ));
}

#[test]
fn test_unknown_element_type_is_mismatch()
{
    let target = target_with_longs(&[0; 4]);
    let value = array(
        "LinAlg::Array<std::complex<double>, unsigned int>",
        "std::complex<double>",
        SnapshotValue::unsigned(2),
    );
    assert!(default_collection().unwrap().lookup(&target, &value).is_none());
}

#[test]
fn test_mismatch_falls_through_to_next_entry()
{
    let target = target_with_longs(&[1, 2, 3, 4]);
    let mut collection = PrinterCollection::new("fallback");
    collection
        .add_printer("strided first", r"^LinAlg::Array<.*>$", PrinterKind::StridedMatrix)
        .unwrap();
    collection
        .add_printer("dense second", r"^LinAlg::Array<.*>$", PrinterKind::DenseMatrix)
        .unwrap();

    let value = array(
        "LinAlg::Array<long, LinAlg::DenseDims>",
        "long",
        dims("LinAlg::DenseDims", &[("M", 2), ("N", 2)]),
    );
    let printer = collection.lookup(&target, &value).unwrap();
    assert_eq!(printer.summary(), "Matrix, 2 x 2:\n");
}

#[test]
fn test_invalid_dimension_falls_through_to_next_entry()
{
    let target = target_with_longs(&[1, 2, 3, 4]);
    let mut collection = PrinterCollection::new("fallback");
    collection
        .add_printer("strided first", r"^LinAlg::Array<.*>$", PrinterKind::StridedMatrix)
        .unwrap();
    collection
        .add_printer("dense second", r"^LinAlg::Array<.*>$", PrinterKind::DenseMatrix)
        .unwrap();

    // The strided entry rejects stride < cols; the dense entry ignores strideM.
    let value = array(
        "LinAlg::Array<long, LinAlg::StridedDims>",
        "long",
        dims("LinAlg::StridedDims", &[("M", 2), ("N", 2), ("strideM", 1)]),
    );
    let printer = collection.lookup(&target, &value).unwrap();
    assert_eq!(printer.summary(), "Matrix, 2 x 2:\n");
    assert_eq!(texts(&printer), [" 1", " 2", "\n     3", " 4 "]);
}

#[test]
fn test_strong_integer_passthrough()
{
    let target = SnapshotTarget::new(MemoryImage::new());
    let value = SnapshotValue::scalar("math::Row", Scalar::Signed(12));
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    assert_eq!(printer.summary(), "12");
    assert!(printer.children().is_none());
    assert!(printer.display_hint().is_none());
    assert_eq!(render(&printer, &RenderOptions::default()), "12");
}

#[test]
fn test_strong_integer_struct_reads_value_field()
{
    let target = SnapshotTarget::new(MemoryImage::new());
    for type_name in ["LinAlg::Row", "LinearAlgebra::AxisInt<(LinearAlgebra::AxisType)0>"] {
        let value = SnapshotValue::structure(
            type_name,
            [("value", SnapshotValue::scalar("unsigned long", Scalar::Unsigned(12)))],
        );
        let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
        assert_eq!(printer.summary(), "12");
        assert!(printer.display_hint().is_none());
    }
}

#[test]
fn test_strong_integer_without_value_field_has_no_printer()
{
    let target = SnapshotTarget::new(MemoryImage::new());
    let value = SnapshotValue::structure("LinAlg::Col", [("other", SnapshotValue::long(3))]);
    assert!(default_collection().unwrap().lookup(&target, &value).is_none());
}

#[test]
fn test_unmatched_type_has_no_printer()
{
    let target = SnapshotTarget::new(MemoryImage::new());
    let value = SnapshotValue::unsigned(3);
    assert!(default_collection().unwrap().lookup(&target, &value).is_none());
}

#[test]
fn test_render_truncates_at_limit()
{
    let target = target_with_longs(&(0..10i64).collect::<Vec<_>>());
    let value = array(
        "LinAlg::Array<long, unsigned int>",
        "long",
        SnapshotValue::unsigned(10),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();

    let page = collect_cells(&printer, &RenderOptions::with_limit(3));
    assert!(page.truncated);
    assert_eq!(page.cells.len(), 3);
    assert_eq!(render(&printer, &RenderOptions::with_limit(3)), "Vector of size: 10 = {0, 1, 2...}");

    let exact = collect_cells(&printer, &RenderOptions::with_limit(10));
    assert!(!exact.truncated);
    assert_eq!(exact.cells.len(), 10);
}

#[test]
fn test_unmapped_elements_render_inline()
{
    let target = target_with_longs(&[1, 2]);
    let value = array(
        "LinAlg::Array<long, LinAlg::DenseDims>",
        "long",
        dims("LinAlg::DenseDims", &[("M", 2), ("N", 2)]),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    let texts = texts(&printer);
    assert_eq!(texts[..2], [" 1", " 2"]);
    assert!(texts[2].starts_with("\n    <error: Cannot access memory"));
    assert!(texts[3].starts_with("<error: Cannot access memory"));
    assert!(texts[3].ends_with("> "));
}

#[test]
fn test_guard_region_elements_render_inline()
{
    let mut image = MemoryImage::new();
    let bytes = [7i64, 8].iter().flat_map(|v| v.to_le_bytes()).collect();
    image.map_with_permissions(Address::from(BASE), bytes, "---", None).unwrap();
    let target = SnapshotTarget::new(image);
    let value = array(
        "LinAlg::Array<long, unsigned int>",
        "long",
        SnapshotValue::unsigned(2),
    );
    let printer = default_collection().unwrap().lookup(&target, &value).unwrap();
    let texts = texts(&printer);
    assert_eq!(texts.len(), 2);
    for text in texts {
        assert!(text.starts_with("<error: Cannot access memory"));
        assert!(text.contains("not readable"));
    }
}
