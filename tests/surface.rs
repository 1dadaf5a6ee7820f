//! Integration tests for the rendered API-surface views.
//!
//! Every test populates its own catalog through the public builders, the way a host that reads
//! real metadata would, and checks the text the views produce.

use apiscope::{
    prelude::*,
    surface::{extensions, members, names},
};

struct Sample {
    catalog: Catalog,
    int32: CilTypeRc,
    string: CilTypeRc,
    list: CilTypeRc,
    sequence: CilTypeRc,
    foo: CilTypeRc,
    outer: CilTypeRc,
    inner: CilTypeRc,
    sequence_ext: CilTypeRc,
}

fn sample() -> Result<Sample> {
    let catalog = Catalog::new();

    let corlib = catalog.add_module(
        "System.Private.CoreLib, Version=8.0.0.0",
        "/usr/share/dotnet/System.Private.CoreLib.dll",
    );
    let core = || TypeBuilder::new(&catalog, &corlib);
    core().primitive(CilPrimitiveKind::Object)?.build()?;
    core().class("System", "ValueType").abstract_type().build()?;
    let string = core().primitive(CilPrimitiveKind::String)?.build()?;
    let int32 = core().primitive(CilPrimitiveKind::I4)?.build()?;

    let t = catalog.make_generic_parameter("T", 0, false);
    let sequence = core()
        .interface("System.Collections.Generic", "IEnumerable")
        .generic_param(&t)
        .build()?;

    let list_t = catalog.make_generic_parameter("T", 0, false);
    let list = core()
        .class("System.Collections.Generic", "List")
        .generic_param(&list_t)
        .implements(&catalog.make_generic_instance(&sequence, &[list_t.clone()])?)
        .build()?;

    let app = catalog.add_module("Acme, Version=1.0.0.0", "/opt/acme/Acme.dll");
    let acme = || TypeBuilder::new(&catalog, &app);

    let foo = acme().class("Acme", "Foo").build()?;
    MethodBuilder::constructor(&catalog, &foo).build()?;

    let outer = acme().class("Acme", "Outer").build()?;
    let inner = acme()
        .value_type("Acme", "Inner")
        .nested_in(&outer)
        .visibility(TypeAttributes::NESTED_PRIVATE)
        .build()?;
    acme().class("Acme.Internal", "Secret").hidden().build()?;
    acme()
        .class("Acme", "<PrivateImplementationDetails>")
        .compiler_generated()
        .build()?;

    let tools = catalog.add_module("Acme.Tools, Version=1.0.0.0", "/opt/acme/Acme.Tools.dll");
    let sequence_ext = TypeBuilder::new(&catalog, &tools)
        .class("Acme.Tools", "SequenceExtensions")
        .static_type()
        .attribute(EXTENSION_ATTRIBUTE)
        .build()?;
    let receiver = catalog.make_generic_instance(&sequence, &[t.clone()])?;
    MethodBuilder::new(&catalog, &sequence_ext, "Bar")
        .extension()
        .param(ParamBuilder::new(&catalog, &receiver).name("source").build())
        .param(ParamBuilder::new(&catalog, &int32).name("n").build())
        .build()?;

    Ok(Sample {
        catalog,
        int32,
        string,
        list,
        sequence,
        foo,
        outer,
        inner,
        sequence_ext,
    })
}

#[test]
fn test_public_class_with_default_constructor() -> Result<()> {
    let sample = sample()?;
    let surface = ApiSurface::new(&sample.catalog);

    let rendered = surface.full_api(&sample.foo)?;
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        [
            "[class System.Object (instance API)]",
            "  [class Acme.Foo (instance API)]",
            "    Foo(): Void",
        ]
    );

    let compact = ApiSurface::with_config(&sample.catalog, SurfaceConfig::compact());
    assert!(compact.full_api(&sample.foo)?.contains("[class Foo (instance API)]"));
    Ok(())
}

#[test]
fn test_extension_for_closed_sequence() -> Result<()> {
    let sample = sample()?;
    let list_of_string = sample
        .catalog
        .make_generic_instance(&sample.list, &[sample.string.clone()])?;

    let containers = extensions::extensions(&sample.catalog, &list_of_string, DEFAULT_MAX_DEPTH)?;
    assert_eq!(containers.len(), 1);
    assert!(containers[0].is_same(&sample.sequence_ext));

    let methods =
        extensions::extension_methods(&sample.sequence_ext, &list_of_string, DEFAULT_MAX_DEPTH)?;
    assert_eq!(methods.len(), 1);
    assert_eq!(
        members::render_extension_method(&methods[0], ParameterLayout::Compact)?,
        ["Bar(n: Int32): Void"]
    );

    let surface = ApiSurface::new(&sample.catalog);
    assert_eq!(
        surface.extensions_view(&list_of_string)?,
        "[extension Acme.Tools.SequenceExtensions] (Acme.Tools.dll)\n  Bar(n: Int32): Void"
    );
    assert!(surface.chain(&list_of_string)?.ends_with(
        "    [extension Acme.Tools.SequenceExtensions] (Acme.Tools.dll)"
    ));
    Ok(())
}

#[test]
fn test_receiver_equal_to_definition_applies() -> Result<()> {
    let sample = sample()?;
    let list_of_int = sample
        .catalog
        .make_generic_instance(&sample.list, &[sample.int32.clone()])?;

    assert!(extensions::can_extend(&sample.list, &list_of_int, DEFAULT_MAX_DEPTH)?);
    assert!(extensions::can_extend(&sample.sequence, &list_of_int, DEFAULT_MAX_DEPTH)?);
    assert!(!extensions::can_extend(&sample.list, &sample.foo, DEFAULT_MAX_DEPTH)?);
    assert!(extensions::extensions(&sample.catalog, &sample.foo, DEFAULT_MAX_DEPTH)?.is_empty());
    Ok(())
}

#[test]
fn test_private_literal_field() -> Result<()> {
    let sample = sample()?;

    let field = FieldBuilder::new(&sample.catalog, &sample.foo, "Name", &sample.int32)
        .access(FieldAttributes::PRIVATE)
        .literal(5)
        .build();
    assert_eq!(members::render_field(&field)?, "Name{private literal}: Int32");
    Ok(())
}

#[test]
fn test_nested_private_value_type() -> Result<()> {
    let sample = sample()?;

    assert_eq!(
        members::render_nested_type(&sample.inner),
        "Outer+Inner{private}: struct"
    );

    let surface = ApiSurface::new(&sample.catalog);
    assert_eq!(
        surface.static_api(&sample.outer)?,
        "[class System.Object]\n  [class Acme.Outer]\n    Outer+Inner{private}: struct"
    );
    Ok(())
}

#[test]
fn test_generic_method_parameters_stay_bare() -> Result<()> {
    let sample = sample()?;
    let t = sample.catalog.make_generic_parameter("T", 0, true);
    let u = sample.catalog.make_generic_parameter("U", 1, true);

    let map = MethodBuilder::new(&sample.catalog, &sample.foo, "Map")
        .generic_param(&t)
        .generic_param(&u)
        .param(ParamBuilder::new(&sample.catalog, &t).name("value").build())
        .returns(&u)
        .build()?;

    assert_eq!(names::member_name(&map, true), "Map<T, U>");
    assert_eq!(
        members::render_method(&map, ParameterLayout::Compact)?,
        ["Map<T, U>(value: T): U"]
    );
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> Result<()> {
    let first = sample()?;
    let second = sample()?;

    let render = |sample: &Sample| -> Result<Vec<String>> {
        let surface = ApiSurface::new(&sample.catalog);
        Ok(vec![
            surface.chain(&sample.list)?,
            surface.static_api(&sample.outer)?,
            surface.full_api(&sample.foo)?,
            surface.modules(),
            surface.namespaces(),
            surface.namespace_view("Acme")?,
        ])
    };

    let once = render(&first)?;
    assert_eq!(once, render(&first)?);
    assert_eq!(once, render(&second)?);
    Ok(())
}

#[test]
fn test_concurrent_rendering() -> Result<()> {
    let sample = sample()?;
    let surface = ApiSurface::new(&sample.catalog);
    let expected = surface.full_api(&sample.foo)?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| ApiSurface::new(&sample.catalog).full_api(&sample.foo)))
            .collect();

        for handle in handles {
            let rendered = handle.join().unwrap().unwrap();
            assert_eq!(rendered, expected);
        }
    });
    Ok(())
}

#[test]
fn test_module_summary() -> Result<()> {
    let sample = sample()?;

    assert_eq!(
        ApiSurface::new(&sample.catalog).modules(),
        [
            "Acme, Version=1.0.0.0 (/opt/acme/Acme.dll)",
            "Acme.Tools, Version=1.0.0.0 (/opt/acme/Acme.Tools.dll)",
            "System.Private.CoreLib, Version=8.0.0.0 \
             (/usr/share/dotnet/System.Private.CoreLib.dll)",
        ]
        .join("\n")
    );
    Ok(())
}

#[test]
fn test_namespace_listing() -> Result<()> {
    let sample = sample()?;

    assert_eq!(
        ApiSurface::new(&sample.catalog).namespaces(),
        "Acme\nAcme.Tools\nSystem\nSystem.Collections.Generic"
    );
    assert_eq!(
        ApiSurface::with_config(&sample.catalog, SurfaceConfig::all()).namespaces(),
        "Acme\nAcme.Internal\nAcme.Tools\nSystem\nSystem.Collections.Generic"
    );
    Ok(())
}

#[test]
fn test_namespace_view_ordering() -> Result<()> {
    let sample = sample()?;
    let surface = ApiSurface::new(&sample.catalog);

    assert_eq!(
        surface.namespace_view("Acme")?,
        "[class Acme.Foo]\n[class Acme.Outer]"
    );
    assert_eq!(
        ApiSurface::with_config(&sample.catalog, SurfaceConfig::all()).namespace_view("Acme")?,
        "[class Acme.Foo]\n[class Acme.Outer]\n[struct Acme.Outer+Inner]"
    );
    Ok(())
}

#[test]
fn test_depth_limit_fails_only_the_request() -> Result<()> {
    let sample = sample()?;
    let shallow = SurfaceConfig {
        max_depth: 0,
        ..SurfaceConfig::default()
    };

    let result = ApiSurface::with_config(&sample.catalog, shallow).chain(&sample.foo);
    assert!(matches!(result, Err(Error::RecursionLimit(0))));

    assert!(ApiSurface::new(&sample.catalog).chain(&sample.foo).is_ok());
    Ok(())
}
