use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jstrip::{Options, Transform, transform};

fn bench_jsx(c: &mut Criterion) {
    let component = r#"
        function Item({label, count}) {
            return (
                <li className="item" data-count={count}>
                    {label} &amp; more
                    <span>{count > 1 ? "many" : "one"}</span>
                </li>
            );
        }
    "#;
    let code = component.repeat(100);
    let options = Options::new(&[Transform::Jsx]);

    c.bench_function("jsx 100 components", |b| {
        b.iter(|| black_box(transform(&code, &options).unwrap()))
    });
}

fn bench_typescript(c: &mut Criterion) {
    let module = r#"
        import {Base, helper} from './base';
        import type {Config} from './config';

        export class Widget<T> extends Base implements Runnable {
            private items: T[] = [];
            static count: number = 0;

            constructor(private readonly config: Config) {
                super();
            }

            run(input: T): void {
                this.items.push(helper(input) as T);
            }
        }
    "#;
    let code = module.repeat(50);
    let options = Options::new(&[Transform::TypeScript, Transform::Imports]);

    c.bench_function("typescript 50 modules", |b| {
        b.iter(|| black_box(transform(&code, &options).unwrap()))
    });
}

fn bench_passthrough(c: &mut Criterion) {
    let code = r#"
        var sum = 0;
        for (var i = 0; i < 10000; i = i + 1) {
            sum = sum + i * 1_000;
        }
    "#
    .repeat(200);
    let options = Options::default();

    c.bench_function("plain js passthrough", |b| {
        b.iter(|| black_box(transform(&code, &options).unwrap()))
    });
}

criterion_group!(benches, bench_jsx, bench_typescript, bench_passthrough);
criterion_main!(benches);
