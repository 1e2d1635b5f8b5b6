#![allow(dead_code)]

use bindery::{id_of, Arguments, Callable, Catalog, Container, Definition, InstantiateErrorKind, Parameter, TypeDescriptor};
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
#[derive(Default)]
struct CAAA;

fn wrapping<T, D>(wrap: fn(Arc<D>) -> T) -> TypeDescriptor
where
    T: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    TypeDescriptor::with_constructor(vec![Parameter::of::<D>("inner")], move |args| {
        Ok::<_, InstantiateErrorKind>(wrap(args.get("inner")?))
    })
}

#[inline]
fn catalog() -> Catalog {
    Catalog::new()
        .with_descriptor(TypeDescriptor::of::<CAAA>())
        .with_descriptor(wrapping(CAA))
        .with_descriptor(wrapping(CA))
        .with_descriptor(wrapping(C))
        .with_descriptor(
            TypeDescriptor::with_constructor(vec![Parameter::scalar::<i32>("value").with_default(2i32)], |args| {
                Ok::<_, InstantiateErrorKind>(B(*args.get::<i32>("value")?))
            }),
        )
        .with_descriptor(TypeDescriptor::with_constructor(
            vec![Parameter::of::<B>("b"), Parameter::of::<C>("c")],
            |args| Ok::<_, InstantiateErrorKind>(A(args.get("b")?, args.get("c")?)),
        ))
}

#[inline]
fn container_new(catalog: &Catalog) -> Container {
    Container::new(catalog.clone())
}

#[inline]
fn container_get(container: &Container) {
    let _ = container.resolve::<A>().unwrap();
}

#[inline]
fn container_build(container: &Container) {
    let _ = container.build(id_of::<A>(), &Arguments::new()).unwrap();
}

#[inline]
fn container_build_definition(container: &Container) {
    let _ = container.build("b", &Arguments::new()).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let catalog = catalog();
    let container_1 = Container::new(catalog.clone());
    container_1.bind(
        "b",
        Definition::new(id_of::<B>()).arg("value", 3i32),
    );
    container_1.bind("factory", Callable::new(vec![], |_| Ok::<_, InstantiateErrorKind>(B(4))));

    c.bench_function("container_new", |b| b.iter(|| container_new(&catalog)))
        .bench_function("container_get", |b| b.iter(|| container_get(&container_new(&catalog))))
        .bench_function("container_get_with_cache", |b| {
            let container = container_1.clone();
            b.iter(|| container_get(&container))
        })
        .bench_function("container_build", |b| b.iter(|| container_build(&container_1)))
        .bench_function("container_build_definition", |b| b.iter(|| container_build_definition(&container_1)))
        .bench_function("container_build_factory", |b| {
            b.iter(|| container_1.build("factory", &Arguments::new()).unwrap())
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
