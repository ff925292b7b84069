//! Periodic-table registry keyed by atomic number.
//!
//! The table is static data; an [`ElementRegistry`] is a cheap view over it
//! that is handed by reference to the normalizer and the composition counter.

use crate::domain::{ElementKey, PtableError, PtableResult};

pub const MAX_ATOMIC_NUMBER: usize = 118;

const ELEMENT_SYMBOLS: [&str; MAX_ATOMIC_NUMBER] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

const ELEMENT_NAMES: [&str; MAX_ATOMIC_NUMBER] = [
    "Hydrogen",
    "Helium",
    "Lithium",
    "Beryllium",
    "Boron",
    "Carbon",
    "Nitrogen",
    "Oxygen",
    "Fluorine",
    "Neon",
    "Sodium",
    "Magnesium",
    "Aluminum",
    "Silicon",
    "Phosphorus",
    "Sulfur",
    "Chlorine",
    "Argon",
    "Potassium",
    "Calcium",
    "Scandium",
    "Titanium",
    "Vanadium",
    "Chromium",
    "Manganese",
    "Iron",
    "Cobalt",
    "Nickel",
    "Copper",
    "Zinc",
    "Gallium",
    "Germanium",
    "Arsenic",
    "Selenium",
    "Bromine",
    "Krypton",
    "Rubidium",
    "Strontium",
    "Yttrium",
    "Zirconium",
    "Niobium",
    "Molybdenum",
    "Technetium",
    "Ruthenium",
    "Rhodium",
    "Palladium",
    "Silver",
    "Cadmium",
    "Indium",
    "Tin",
    "Antimony",
    "Tellurium",
    "Iodine",
    "Xenon",
    "Cesium",
    "Barium",
    "Lanthanum",
    "Cerium",
    "Praseodymium",
    "Neodymium",
    "Promethium",
    "Samarium",
    "Europium",
    "Gadolinium",
    "Terbium",
    "Dysprosium",
    "Holmium",
    "Erbium",
    "Thulium",
    "Ytterbium",
    "Lutetium",
    "Hafnium",
    "Tantalum",
    "Tungsten",
    "Rhenium",
    "Osmium",
    "Iridium",
    "Platinum",
    "Gold",
    "Mercury",
    "Thallium",
    "Lead",
    "Bismuth",
    "Polonium",
    "Astatine",
    "Radon",
    "Francium",
    "Radium",
    "Actinium",
    "Thorium",
    "Protactinium",
    "Uranium",
    "Neptunium",
    "Plutonium",
    "Americium",
    "Curium",
    "Berkelium",
    "Californium",
    "Einsteinium",
    "Fermium",
    "Mendelevium",
    "Nobelium",
    "Lawrencium",
    "Rutherfordium",
    "Dubnium",
    "Seaborgium",
    "Bohrium",
    "Hassium",
    "Meitnerium",
    "Darmstadtium",
    "Roentgenium",
    "Copernicium",
    "Nihonium",
    "Flerovium",
    "Moscovium",
    "Livermorium",
    "Tennessine",
    "Oganesson",
];

// Last atomic number of each period.
const PERIOD_ENDS: [usize; 7] = [2, 10, 18, 36, 54, 86, 118];

static STANDARD_REGISTRY: ElementRegistry = ElementRegistry {
    symbols: &ELEMENT_SYMBOLS,
    names: &ELEMENT_NAMES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub atomic_number: usize,
    pub symbol: &'static str,
    pub name: &'static str,
}

impl Element {
    pub fn period(&self) -> usize {
        PERIOD_ENDS
            .iter()
            .position(|end| self.atomic_number <= *end)
            .map(|index| index + 1)
            .unwrap_or(PERIOD_ENDS.len())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElementRegistry {
    symbols: &'static [&'static str; MAX_ATOMIC_NUMBER],
    names: &'static [&'static str; MAX_ATOMIC_NUMBER],
}

impl ElementRegistry {
    pub fn standard() -> &'static Self {
        &STANDARD_REGISTRY
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn by_atomic_number(&self, atomic_number: usize) -> Option<Element> {
        let index = index_for_atomic_number(atomic_number)?;
        Some(Element {
            atomic_number,
            symbol: self.symbols[index],
            name: self.names[index],
        })
    }

    /// Exact, case-sensitive symbol lookup (`"Co"` and `"CO"` differ).
    pub fn by_symbol(&self, symbol: &str) -> Option<Element> {
        self.symbols
            .iter()
            .position(|candidate| *candidate == symbol)
            .and_then(|index| self.by_atomic_number(index + 1))
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.by_symbol(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        (1..=self.len()).filter_map(|atomic_number| self.by_atomic_number(atomic_number))
    }

    /// Resolve a caller-supplied key. Out-of-range atomic numbers and unknown
    /// symbols are input-validation errors.
    pub fn resolve(&self, key: &ElementKey) -> PtableResult<Element> {
        match key {
            ElementKey::Symbol(symbol) => self.by_symbol(symbol).ok_or_else(|| {
                PtableError::input_validation(
                    "INPUT.UNKNOWN_ELEMENT",
                    format!("'{symbol}' is not a recognized element symbol"),
                )
            }),
            ElementKey::AtomicNumber(number) => usize::try_from(*number)
                .ok()
                .and_then(|atomic_number| self.by_atomic_number(atomic_number))
                .ok_or_else(|| out_of_range_error(&[*number], self.len())),
        }
    }

    /// Resolve a batch of keys, reporting every out-of-range atomic number in
    /// one error before any unknown symbol.
    pub fn resolve_all<'a, I>(&self, keys: I) -> PtableResult<Vec<Element>>
    where
        I: IntoIterator<Item = &'a ElementKey>,
    {
        let keys: Vec<&ElementKey> = keys.into_iter().collect();
        let out_of_range: Vec<i64> = keys
            .iter()
            .filter_map(|key| match key {
                ElementKey::AtomicNumber(number)
                    if *number < 1 || *number > self.len() as i64 =>
                {
                    Some(*number)
                }
                _ => None,
            })
            .collect();
        if !out_of_range.is_empty() {
            return Err(out_of_range_error(&out_of_range, self.len()));
        }

        keys.into_iter().map(|key| self.resolve(key)).collect()
    }
}

fn out_of_range_error(numbers: &[i64], max: usize) -> PtableError {
    let listed = numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    PtableError::input_validation(
        "INPUT.ATOMIC_NUMBER_RANGE",
        format!(
            "numeric keys [{listed}] are assumed to represent atomic numbers but fall outside 1..={max}"
        ),
    )
}

const fn index_for_atomic_number(atomic_number: usize) -> Option<usize> {
    if atomic_number == 0 || atomic_number > MAX_ATOMIC_NUMBER {
        None
    } else {
        Some(atomic_number - 1)
    }
}
