//! Name translation tables for emitted JavaScript
//!
//! Three read-only tables: identifier references, non-computed property
//! names, and method names in call position. Binding sites never go through
//! these lookups.

/// Identifier references rewritten to host functions and objects
pub const IDENTIFIERS: &[(&str, &str)] = &[
    ("mostrar", "console.log"),
    ("imprime", "console.log"),
    ("alerta", "alert"),
    ("aleatorio", "Math.random"),
    ("arredondar", "Math.round"),
    ("piso", "Math.floor"),
    ("teto", "Math.ceil"),
    ("matematica", "Math"),
];

/// Property names rewritten wherever they appear after `.` or `?.`
pub const PROPERTIES: &[(&str, &str)] = &[
    ("tamanho", "length"),
    ("prototipo", "prototype"),
];

/// Method names rewritten only when called through a member access
pub const METHODS: &[(&str, &str)] = &[
    ("naPosicao", "at"),
    ("concatenar", "concat"),
    ("preencher", "fill"),
    ("filtrar", "filter"),
    ("encontrar", "find"),
    ("encontrarIndice", "findIndex"),
    ("encontrarUltimo", "findLast"),
    ("encontrarUltimoIndice", "findLastIndex"),
    ("achatar", "flat"),
    ("achatarMapear", "flatMap"),
    ("paraCada", "forEach"),
    ("inclui", "includes"),
    ("indiceDe", "indexOf"),
    ("juntar", "join"),
    ("ehLista", "isArray"),
    ("chaves", "keys"),
    ("mapear", "map"),
    ("reduzir", "reduce"),
    ("reduzirDireita", "reduceRight"),
    ("inverter", "reverse"),
    ("removerInicio", "shift"),
    ("adicionarInicio", "unshift"),
    ("fatiar", "slice"),
    ("algum", "some"),
    ("ordenar", "sort"),
    ("emendar", "splice"),
    ("paraTexto", "toString"),
    ("valorDe", "valueOf"),
    ("invertida", "toReversed"),
    ("ordenada", "toSorted"),
    ("emendada", "toSpliced"),
    ("com", "with"),
    ("adicionar", "push"),
    ("removerFim", "pop"),
    ("maiusculo", "toUpperCase"),
    ("minusculo", "toLowerCase"),
];

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table.iter().find(|(from, _)| *from == name).map(|(_, to)| *to)
}

/// Target spelling of an identifier reference
pub fn map_identifier(name: &str) -> &str {
    lookup(IDENTIFIERS, name).unwrap_or(name)
}

/// Target spelling of a non-computed property name
pub fn map_property(name: &str) -> &str {
    lookup(PROPERTIES, name).unwrap_or(name)
}

/// Target spelling of a method name in `obj.metodo(...)` position.
/// Falls back to the property table so `lista.tamanho` style names still map.
pub fn map_method(name: &str) -> &str {
    lookup(METHODS, name)
        .or_else(|| lookup(PROPERTIES, name))
        .unwrap_or(name)
}
