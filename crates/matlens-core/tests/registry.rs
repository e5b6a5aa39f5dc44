//! Tests for the process-wide printer registry
//!
//! Tests in this file share the global registry, so each one uses its own
//! module id.

use matlens_core::error::PrinterError;
use matlens_core::registry::{self, ModuleId};
use matlens_core::snapshot::{MemoryImage, SnapshotTarget, SnapshotValue};
use matlens_core::types::Address;

fn vector_value() -> SnapshotValue
{
    SnapshotValue::structure(
        "LinAlg::Array<int, unsigned int>",
        [
            ("ptr", SnapshotValue::pointer("int *", Address::from(0x4000))),
            ("sz", SnapshotValue::unsigned(2)),
        ],
    )
}

fn target() -> SnapshotTarget
{
    let mut image = MemoryImage::new();
    let bytes = [10i32, -20].iter().flat_map(|v| v.to_le_bytes()).collect();
    image.map(Address::from(0x4000), bytes, None).unwrap();
    SnapshotTarget::new(image)
}

#[test]
fn test_attach_lookup_detach()
{
    let module = ModuleId(1001);
    let target = target();
    let value = vector_value();

    assert!(registry::global().lookup(Some(module), &target, &value).is_none());

    registry::on_attach(module).unwrap();
    assert!(registry::global().has_module(module));
    {
        let registry = registry::global();
        let printer = registry.lookup(Some(module), &target, &value).unwrap();
        assert_eq!(printer.summary(), "Vector of size: 2");
        let texts: Vec<String> = printer.children().unwrap().map(|cell| cell.text).collect();
        assert_eq!(texts, ["10", "-20"]);
    }

    registry::on_detach(module);
    assert!(!registry::global().has_module(module));
    assert!(registry::global().lookup(Some(module), &target, &value).is_none());
}

#[test]
fn test_other_modules_do_not_see_registration()
{
    let module = ModuleId(2002);
    let target = target();
    let value = vector_value();

    registry::on_attach(module).unwrap();
    assert!(registry::global().lookup(Some(ModuleId(2003)), &target, &value).is_none());
    assert!(registry::global().lookup(None, &target, &value).is_none());
    registry::on_detach(module);
}

#[test]
fn test_double_attach_rejected()
{
    let module = ModuleId(3003);
    registry::on_attach(module).unwrap();
    assert!(matches!(
        registry::on_attach(module),
        Err(PrinterError::DuplicateCollection(name)) if name == "LoopModels"
    ));
    registry::on_detach(module);
    registry::on_attach(module).unwrap();
    registry::on_detach(module);
}
