//! Shared fixtures for unit tests.
//!
//! [`CatalogFixture`] populates a catalog with three modules: a trimmed core library, a widget
//! library and a library of extension containers. Every type a test needs to reference directly
//! is exposed as a field.

use crate::{
    metadata::{
        members::{
            EventBuilder, FieldAttributes, FieldBuilder, MethodAccessFlags, MethodBuilder,
            MethodRc, ParamBuilder, PropertyBuilder,
        },
        module::ModuleRc,
        typesystem::{CilPrimitiveKind, CilTypeRc, TypeAttributes, TypeBuilder, EXTENSION_ATTRIBUTE},
    },
    Catalog,
};

/// A populated catalog and handles to its interesting types
pub struct CatalogFixture {
    pub catalog: Catalog,

    pub corlib: ModuleRc,
    pub app: ModuleRc,
    pub ext: ModuleRc,

    pub object: CilTypeRc,
    pub string: CilTypeRc,
    pub int32: CilTypeRc,
    pub double: CilTypeRc,
    pub handler: CilTypeRc,
    pub nongeneric_enumerable: CilTypeRc,
    /// `IEnumerable<T>`, the generic definition
    pub enumerable: CilTypeRc,
    /// `IEnumerable<T>` bound to the parameter of `List<T>`
    pub enumerable_of_t: CilTypeRc,
    pub enumerable_of_string: CilTypeRc,
    pub list: CilTypeRc,
    pub list_of_string: CilTypeRc,
    /// `List<T>` bound to the parameter of `Observable<T>`
    pub list_of_t: CilTypeRc,
    pub observable: CilTypeRc,
    pub observable_of_string: CilTypeRc,
    pub string_array: CilTypeRc,
    pub int_pointer: CilTypeRc,

    pub widget: CilTypeRc,
    pub shape: CilTypeRc,
    pub circle: CilTypeRc,
    pub point: CilTypeRc,
    pub color: CilTypeRc,
    pub outer: CilTypeRc,
    pub inner: CilTypeRc,
    pub innermost: CilTypeRc,
    pub display_class: CilTypeRc,
    pub hidden: CilTypeRc,
    pub plain_static: CilTypeRc,

    pub sequence_ext: CilTypeRc,
    pub widget_ext: CilTypeRc,
    /// `SequenceExtensions.Bar(this IEnumerable<T> source, int n)`
    pub bar: MethodRc,
}

impl CatalogFixture {
    pub fn new() -> Self {
        let catalog = Catalog::new();

        let corlib = catalog.add_module(
            "System.Private.CoreLib, Version=8.0.0.0",
            "/usr/share/dotnet/System.Private.CoreLib.dll",
        );
        let app = catalog.add_module("Acme.Widgets, Version=2.1.0.0", "/opt/acme/Acme.Widgets.dll");
        let ext = catalog.add_module(
            "Acme.Extensions, Version=1.0.0.0",
            "/opt/acme/Acme.Extensions.dll",
        );

        let core = || TypeBuilder::new(&catalog, &corlib);
        let object = core().primitive(CilPrimitiveKind::Object).unwrap().build().unwrap();
        let value_type = core()
            .class("System", "ValueType")
            .abstract_type()
            .build()
            .unwrap();
        core()
            .class("System", "Enum")
            .abstract_type()
            .extends(&value_type)
            .build()
            .unwrap();
        core()
            .class("System", "Array")
            .abstract_type()
            .build()
            .unwrap();
        core().primitive(CilPrimitiveKind::Void).unwrap().build().unwrap();
        let string = core().primitive(CilPrimitiveKind::String).unwrap().build().unwrap();
        let int32 = core().primitive(CilPrimitiveKind::I4).unwrap().build().unwrap();
        let double = core().primitive(CilPrimitiveKind::R8).unwrap().build().unwrap();
        let handler = core().class("System", "EventHandler").sealed().build().unwrap();

        let nongeneric_enumerable = core()
            .interface("System.Collections", "IEnumerable")
            .build()
            .unwrap();
        let enumerable_param = catalog.make_generic_parameter("T", 0, false);
        let enumerable = core()
            .interface("System.Collections.Generic", "IEnumerable")
            .generic_param(&enumerable_param)
            .implements(&nongeneric_enumerable)
            .build()
            .unwrap();

        let list_param = catalog.make_generic_parameter("T", 0, false);
        let enumerable_of_t = catalog
            .make_generic_instance(&enumerable, &[list_param.clone()])
            .unwrap();
        let list = core()
            .class("System.Collections.Generic", "List")
            .generic_param(&list_param)
            .implements(&enumerable_of_t)
            .implements(&nongeneric_enumerable)
            .build()
            .unwrap();
        MethodBuilder::constructor(&catalog, &list).build().unwrap();
        MethodBuilder::new(&catalog, &list, "Add")
            .param(ParamBuilder::new(&catalog, &list_param).name("item").build())
            .build()
            .unwrap();

        let list_of_string = catalog
            .make_generic_instance(&list, &[string.clone()])
            .unwrap();
        let enumerable_of_string = catalog
            .make_generic_instance(&enumerable, &[string.clone()])
            .unwrap();
        let string_array = catalog.make_array(&string, 1);
        let int_pointer = catalog.make_pointer(&int32);

        let acme = || TypeBuilder::new(&catalog, &app);

        let widget = acme().class("Acme.Widgets", "Widget").build().unwrap();
        MethodBuilder::constructor(&catalog, &widget).build().unwrap();
        MethodBuilder::new(&catalog, &widget, "Draw")
            .virtual_method()
            .param(ParamBuilder::new(&catalog, &object).name("canvas").build())
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &widget, "Create")
            .static_method()
            .returns(&widget)
            .build()
            .unwrap();
        FieldBuilder::new(&catalog, &widget, "count", &int32)
            .access(FieldAttributes::PRIVATE)
            .build();
        FieldBuilder::new(&catalog, &widget, "MaxSize", &int32)
            .literal(512)
            .build();

        let get_title = MethodBuilder::new(&catalog, &widget, "get_Title")
            .returns(&string)
            .build()
            .unwrap();
        let set_title = MethodBuilder::new(&catalog, &widget, "set_Title")
            .param(ParamBuilder::new(&catalog, &string).name("value").build())
            .build()
            .unwrap();
        PropertyBuilder::new(&catalog, &widget, "Title", &string)
            .getter(&get_title)
            .setter(&set_title)
            .build()
            .unwrap();

        let add_changed = MethodBuilder::new(&catalog, &widget, "add_Changed")
            .param(ParamBuilder::new(&catalog, &handler).name("value").build())
            .build()
            .unwrap();
        let remove_changed = MethodBuilder::new(&catalog, &widget, "remove_Changed")
            .access(MethodAccessFlags::PRIVATE)
            .param(ParamBuilder::new(&catalog, &handler).name("value").build())
            .build()
            .unwrap();
        EventBuilder::new(&catalog, &widget, "Changed", &handler)
            .adder(&add_changed)
            .remover(&remove_changed)
            .build()
            .unwrap();

        let shape = acme()
            .class("Acme.Geometry", "Shape")
            .abstract_type()
            .build()
            .unwrap();
        MethodBuilder::constructor(&catalog, &shape)
            .access(MethodAccessFlags::FAMILY)
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &shape, "Area")
            .abstract_method()
            .returns(&double)
            .build()
            .unwrap();

        let circle = acme()
            .class("Acme.Geometry", "Circle")
            .sealed()
            .extends(&shape)
            .build()
            .unwrap();
        MethodBuilder::constructor(&catalog, &circle)
            .param(ParamBuilder::new(&catalog, &double).name("radius").build())
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &circle, "Area")
            .sealed_override()
            .returns(&double)
            .build()
            .unwrap();

        let point = acme().value_type("Acme.Widgets", "Point").build().unwrap();
        FieldBuilder::new(&catalog, &point, "X", &int32).build();
        FieldBuilder::new(&catalog, &point, "Y", &int32).build();

        let color = acme().enumeration("Acme.Widgets", "Color").build().unwrap();
        FieldBuilder::new(&catalog, &color, "Red", &color).literal(0).build();
        FieldBuilder::new(&catalog, &color, "Green", &color).literal(1).build();

        let outer = acme().class("Acme.Widgets", "Outer").build().unwrap();
        let inner = acme()
            .value_type("Acme.Widgets", "Inner")
            .nested_in(&outer)
            .visibility(TypeAttributes::NESTED_PRIVATE)
            .build()
            .unwrap();
        let innermost = acme()
            .class("Acme.Widgets", "Innermost")
            .nested_in(&inner)
            .build()
            .unwrap();
        let display_class = acme()
            .class("Acme.Widgets", "<>c__DisplayClass0_0")
            .sealed()
            .nested_in(&outer)
            .visibility(TypeAttributes::NESTED_PRIVATE)
            .compiler_generated()
            .build()
            .unwrap();

        let hidden = acme().class("Acme.Internal", "Registry").hidden().build().unwrap();
        let plain_static = acme()
            .class("Acme.Widgets", "Defaults")
            .static_type()
            .build()
            .unwrap();

        let observable_param = catalog.make_generic_parameter("T", 0, false);
        let list_of_t = catalog
            .make_generic_instance(&list, &[observable_param.clone()])
            .unwrap();
        let observable = acme()
            .class("Acme.Collections", "Observable")
            .generic_param(&observable_param)
            .extends(&list_of_t)
            .build()
            .unwrap();
        let observable_of_string = catalog
            .make_generic_instance(&observable, &[string.clone()])
            .unwrap();

        let extensions = || TypeBuilder::new(&catalog, &ext);

        let sequence_ext = extensions()
            .class("Acme.Extensions", "SequenceExtensions")
            .static_type()
            .attribute(EXTENSION_ATTRIBUTE)
            .build()
            .unwrap();
        let bar = MethodBuilder::new(&catalog, &sequence_ext, "Bar")
            .extension()
            .param(ParamBuilder::new(&catalog, &enumerable_of_t).name("source").build())
            .param(ParamBuilder::new(&catalog, &int32).name("n").build())
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &sequence_ext, "Nothing")
            .extension()
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &sequence_ext, "Helper")
            .static_method()
            .param(ParamBuilder::new(&catalog, &widget).name("widget").build())
            .build()
            .unwrap();

        let widget_ext = extensions()
            .class("Acme.Extensions", "WidgetExtensions")
            .static_type()
            .attribute(EXTENSION_ATTRIBUTE)
            .build()
            .unwrap();
        MethodBuilder::new(&catalog, &widget_ext, "Shake")
            .extension()
            .param(ParamBuilder::new(&catalog, &widget).name("widget").build())
            .param(ParamBuilder::new(&catalog, &int32).name("times").build())
            .build()
            .unwrap();

        CatalogFixture {
            catalog,
            corlib,
            app,
            ext,
            object,
            string,
            int32,
            double,
            handler,
            nongeneric_enumerable,
            enumerable,
            enumerable_of_t,
            enumerable_of_string,
            list,
            list_of_string,
            list_of_t,
            observable,
            observable_of_string,
            string_array,
            int_pointer,
            widget,
            shape,
            circle,
            point,
            color,
            outer,
            inner,
            innermost,
            display_class,
            hidden,
            plain_static,
            sequence_ext,
            widget_ext,
            bar,
        }
    }
}
