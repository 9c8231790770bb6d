/*!

This is the long-form manual for `rla_tally` and `rlacompare`.

## Inputs

### Counties

The list of the participating counties, as published in the election settings of the
results website (`electionsettings.json`, under
`settings.electiondetails.participatingcounties`). Each entry looks like:

```text
Appling|105371|271560|11/16/2020 3:48:35 PM EST|16
```

The first field is the name of the county, with underscores instead of spaces. The next two
fields are the identifiers of the county in the results website. The position of the
county in the list is its index, which is used to name the official results files.

### Official results

One `detail.xml` file per county, named `NNN-Name.xml` where `NNN` is the index of the
county (for example `000-Appling.xml`, `010-Ben_Hill.xml`). Only the first contest of
the file is read, and it must be the presidential contest:
- the ballots cast come from the `VoterTurnout` element
- the overvotes and the undervotes come from the `VoteType` elements of the contest
- the sum of the votes of the candidates comes from the `Choice` elements of the contest.

Any choice that is not one of the expected candidates stops the comparison.

### Audit results

The batch results of the statewide audit, as a CSV file with a header row. Every row
has 10 columns: the county (in uppercase), two columns that are not used, and the vote
counts for Trump, Biden, Jorgensen, the invalid write-ins, the valid write-ins, the
undervotes and the overvotes.

## Correction

The audit of Gwinnett County counted the second sheet of the multi-card absentee ballots
as undervotes for the presidential contest, although this sheet did not have the
contest. The number of such cards (119461) is removed from the audit ballots cast and
undervotes of Gwinnett. This number is taken from the official results of the county
(Transit Referendum, column "Absentee by"). It is only an approximation: the true
number of second sheets found during the audit is not known.

## Output

A CSV file with one row per county and one row `ALL` for the whole state:

| column     | content                                     |
|------------|---------------------------------------------|
| `County`   | the name of the county                      |
| `Ofc-*`    | official totals: TBJ, BC, Und, Ovr          |
| `RLA-*`    | audit totals: TBJ, BC, Und, Ovr, InvW, ValW |
| `Δ-*`      | audit minus official: TBJ, BC, Und, Ovr     |

`TBJ` is the sum of the votes for Trump, Biden and Jorgensen, `BC` the ballots cast.
The `ALL` row comes first, followed by the counties with the largest difference in
ballots cast.

*/
